//! The capabilities a host tree lends to the reconciler.
//!
//! The reconciler never owns nodes. It reads the tree through [`LiveTree`],
//! mutates it through [`TreeMut`] and hands per-node state over to
//! [`NodeSync`]. A single host type usually implements all three.

use core::fmt;
use core::hash::Hash;

/// Read access to a tree of nodes.
pub trait LiveTree {
    /// Handle to a node. Cheap to copy, compared by identity.
    type Node: Copy + Eq + fmt::Debug;

    /// Type/category label used to decide whether two nodes may be merged.
    type Tag: ?Sized + Eq + Hash;

    /// Stable identity token, unique among siblings when present.
    type Key: ?Sized + Eq + Hash;

    /// Whether `node` is a node of this tree.
    fn contains(&self, node: Self::Node) -> bool;

    /// Children of `node`, in order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// The node's tag.
    fn tag(&self, node: Self::Node) -> &Self::Tag;

    /// The node's key, if it has one.
    fn key(&self, node: Self::Node) -> Option<&Self::Key>;

    /// Whether `a` and `b` are the very same node.
    ///
    /// Identical pairs short-circuit all diffing.
    #[inline]
    fn identical(&self, a: Self::Node, b: Self::Node) -> bool {
        a == b
    }

    /// Whether `b` can be merged into `a` rather than replacing it.
    ///
    /// Two distinct nodes are compatible when their tags are equal and their
    /// keys are equal (including both being absent). This is the equality
    /// oracle of both alignment algorithms, so it must be total and free of
    /// side effects.
    #[inline]
    fn compatible(&self, a: Self::Node, b: Self::Node) -> bool {
        self.identical(a, b) || (self.tag(a) == self.tag(b) && self.key(a) == self.key(b))
    }
}

/// Structural mutation of a tree.
pub trait TreeMut: LiveTree {
    /// Insert `node` as a child of `parent`, before `reference` or at the end
    /// when `reference` is `None`.
    ///
    /// If `node` is attached somewhere else it is moved.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        node: Self::Node,
        reference: Option<Self::Node>,
    );

    /// Detach `node` from `parent`.
    fn remove_child(&mut self, parent: Self::Node, node: Self::Node);

    /// Detach every child of `parent`.
    fn clear_children(&mut self, parent: Self::Node) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.remove_child(parent, child);
        }
    }

    /// Put `new` where `old` is and detach `old`.
    fn replace_child(&mut self, parent: Self::Node, new: Self::Node, old: Self::Node) {
        self.insert_before(parent, new, Some(old));
        self.remove_child(parent, old);
    }
}

/// Copies a node's non-child state onto another node of the same tag.
pub trait NodeSync: LiveTree {
    /// Make `live` look like `target`, children excluded.
    ///
    /// Called exactly once per compatible pair, before the pair's children
    /// are reconciled. Must not touch children or identity.
    fn sync(&mut self, target: Self::Node, live: Self::Node);
}
