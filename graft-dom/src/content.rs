//! Blueprints for building nodes.
//!
//! A [`Content`] is a plain owned description of a subtree. It is what tests
//! and fixtures write down, and what [`Document::build`](crate::Document::build)
//! materialises into arena nodes.

use facet::Facet;
use indexmap::IndexMap;

/// Owned description of a node and its descendants.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Content {
    /// An element.
    Element {
        /// Element name.
        tag: String,
        /// Identity among siblings, if any.
        key: Option<String>,
        /// Attributes, in serialization order.
        attrs: IndexMap<String, String>,
        /// Child nodes.
        children: Vec<Content>,
    },
    /// A text node.
    Text(String),
    /// A comment.
    Comment(String),
}

impl Content {
    /// Add an attribute. No-op on text and comments.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Content::Element { attrs, .. } = &mut self {
            attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Set the key. No-op on text and comments.
    pub fn key(mut self, id: impl Into<String>) -> Self {
        if let Content::Element { key, .. } = &mut self {
            *key = Some(id.into());
        }
        self
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        match self {
            Content::Element { children, .. } => 1 + children.iter().map(Content::len).sum::<usize>(),
            Content::Text(_) | Content::Comment(_) => 1,
        }
    }

    /// Always false: a blueprint describes at least one node.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// An element with the given children and no key or attributes.
pub fn el(tag: impl Into<String>, children: impl IntoIterator<Item = Content>) -> Content {
    Content::Element {
        tag: tag.into(),
        key: None,
        attrs: IndexMap::new(),
        children: children.into_iter().collect(),
    }
}

/// A text node.
pub fn text(content: impl Into<String>) -> Content {
    Content::Text(content.into())
}

/// A comment.
pub fn comment(content: impl Into<String>) -> Content {
    Content::Comment(content.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_builders() {
        let list = el("ul", [el("li", [text("a")]).key("1"), comment("end")]).attr("class", "x");
        assert_eq!(list.len(), 4);

        let Content::Element {
            tag,
            key,
            attrs,
            children,
        } = &list
        else {
            panic!("expected an element");
        };
        assert_eq!(tag, "ul");
        assert_eq!(key, &None);
        assert_eq!(attrs.get("class").map(String::as_str), Some("x"));
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_key_is_ignored_on_text() {
        assert_eq!(text("a").key("k"), text("a"));
    }
}
