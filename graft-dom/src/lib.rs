//! # graft-dom
//!
//! An arena-backed HTML-like DOM that morphs in place with [`graft`].
//!
//! Build a live tree and a target tree in the same [`Document`], then call
//! [`Document::morph`]: the live tree is edited until it serializes exactly like
//! the target, reusing every node that can be reused.
//!
//! ```ignore
//! use graft_dom::{Document, el, text};
//!
//! let mut doc = Document::new();
//! let live = doc.build(&el("ul", [el("li", [text("a")]).key("a")]));
//! let target = doc.build(&el("ul", [el("li", [text("b")]).key("b"), el("li", [text("a")]).key("a")]));
//! let root = doc.morph(live, target)?;
//! assert_eq!(doc.to_html(root), "<ul><li>b</li><li>a</li></ul>");
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

pub use indextree::{self, NodeId};

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

/// Blueprints for building nodes
pub mod content;
/// Arena-based DOM
pub mod dom;
mod error;

pub use content::{Content, comment, el, text};
pub use dom::{COMMENT_TAG, Document, ElementData, NodeData, NodeKind, TEXT_TAG};
pub use error::DomError;
