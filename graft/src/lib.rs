//! # Graft
//!
//! In-place reconciliation of ordered node trees.
//!
//! Given a *live* tree that is being displayed or otherwise observed and a
//! freshly built *target* tree, graft mutates the live tree until it mirrors
//! the target, keeping every live node that can be kept so that its identity
//! (and whatever state hangs off it) survives.
//!
//! ## How it works
//!
//! 1. **Walk**: each (target, live) pair is kept as-is when the nodes are
//!    identical, replaced when they are incompatible (different tag or key),
//!    and otherwise synced and recursed into.
//! 2. **Diff**: two child lists are aligned by a bounded Myers search for the
//!    shortest edit script. Past the bound, a keyed patience alignment takes
//!    over: cheaper, always valid, not always shortest.
//! 3. **Apply**: the script is applied left to right with offset tracking.
//!    Keyed children that are deleted in one place and inserted in another
//!    are moved instead of recreated.
//!
//! The host tree plugs in through three traits: [`LiveTree`] (reading),
//! [`TreeMut`] (structural mutation) and [`NodeSync`] (per-node state).
//!
//! ## Usage
//!
//! ```ignore
//! use graft::{Reconciler, ReconcileConfig};
//!
//! let mut reconciler = Reconciler::new(&mut dom);
//! let root = reconciler.reconcile(live_root, target_root)?.node();
//! println!("{:?}", reconciler.stats());
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

/// Approximate keyed alignment
pub mod align;
mod apply;
/// Child-list diffing
pub mod diff;
mod error;
/// Bounded Myers shortest edit script
pub mod myers;
mod script;
mod tree;
mod walk;

#[cfg(test)]
pub(crate) mod test_tree;

pub use align::{Signature, approximate_alignment};
pub use apply::PatchCursor;
pub use diff::{ChildDiff, Strategy, common_affixes, diff_children};
pub use error::ReconcileError;
pub use myers::{DistanceExceeded, diff_slices, shortest_edit_script};
pub use script::{Edit, EditScript};
pub use tree::{LiveTree, NodeSync, TreeMut};
pub use walk::{Morph, ReconcileConfig, ReconcileStats, Reconciler, reconcile};
