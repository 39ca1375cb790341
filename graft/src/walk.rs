//! The node walker: decides, for every (target, live) pair, whether the live
//! node is kept, replaced, adopted or removed, and recurses into children.

use smallvec::SmallVec;

use crate::diff::{Strategy, diff_children};
use crate::error::ReconcileError;
use crate::tree::{NodeSync, TreeMut};
use crate::{debug, trace};

/// Tuning knobs for reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Largest edit distance the exact search will look for before handing
    /// over to the approximate aligner.
    pub max_edit_distance: usize,

    /// Keep leading and trailing runs of compatible children without
    /// searching.
    pub trim_common_affixes: bool,

    /// Move a keyed live child to the position of a compatible target child
    /// with the same key instead of deleting one and inserting the other.
    pub keyed_moves: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 50,
            trim_common_affixes: true,
            keyed_moves: true,
        }
    }
}

/// What became of a (target, live) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Morph<N> {
    /// The live node stays; it now mirrors the target.
    Kept(N),
    /// The nodes are incompatible; the target node takes the live node's
    /// place.
    Replaced(N),
    /// There was no live node; the target node is taken as-is.
    Adopted(N),
}

impl<N: Copy> Morph<N> {
    /// The node that ends up in the live tree.
    pub fn node(self) -> N {
        match self {
            Morph::Kept(node) | Morph::Replaced(node) | Morph::Adopted(node) => node,
        }
    }
}

/// Counters collected over one reconciler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Pairs handed to the walker.
    pub walked: usize,
    /// Compatible pairs whose state was synced.
    pub synced: usize,
    /// Pairs resolved as identical nodes.
    pub identical: usize,
    /// Live nodes substituted by an incompatible target node.
    pub replaced: usize,
    /// Target nodes taken as-is for want of a live node.
    pub adopted: usize,
    /// Live nodes left without a target counterpart.
    pub removed: usize,
    /// Target children inserted into the live tree.
    pub inserted: usize,
    /// Live children detached from the tree.
    pub deleted: usize,
    /// Keyed live children moved instead of recreated.
    pub moved: usize,
    /// Child lists emptied in one operation.
    pub cleared: usize,
    /// Child lists handled by a fast path.
    pub fast_paths: usize,
    /// Child lists aligned by the exact search.
    pub exact_diffs: usize,
    /// Child lists aligned by the approximate aligner.
    pub approximate_diffs: usize,
}

/// Reconciles live nodes of a host tree against target nodes.
pub struct Reconciler<'h, H> {
    pub(crate) host: &'h mut H,
    pub(crate) config: ReconcileConfig,
    pub(crate) stats: ReconcileStats,
}

impl<'h, H> Reconciler<'h, H>
where
    H: TreeMut + NodeSync,
{
    /// Create a reconciler with the default configuration.
    pub fn new(host: &'h mut H) -> Self {
        Self::with_config(host, ReconcileConfig::default())
    }

    /// Create a reconciler with a custom configuration.
    pub fn with_config(host: &'h mut H, config: ReconcileConfig) -> Self {
        Self {
            host,
            config,
            stats: ReconcileStats::default(),
        }
    }

    /// Counters collected so far.
    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Reconcile the tree rooted at `live` against the tree rooted at
    /// `target`.
    ///
    /// Returns [`Morph::Kept`] when `live` was updated in place, or
    /// [`Morph::Replaced`] when the roots are incompatible: the caller must
    /// then put the returned node where `live` was.
    pub fn reconcile(
        &mut self,
        live: H::Node,
        target: H::Node,
    ) -> Result<Morph<H::Node>, ReconcileError> {
        if !self.host.contains(live) {
            return Err(ReconcileError::UnknownLiveRoot);
        }
        if !self.host.contains(target) {
            return Err(ReconcileError::UnknownTargetRoot);
        }

        debug!(?live, ?target, "reconcile start");
        let morph = self.walk_pair(target, live);
        debug!(?morph, stats = ?self.stats, "reconcile done");
        Ok(morph)
    }

    /// Reconcile one pair.
    ///
    /// `None` means the live node has no counterpart and should be detached
    /// by the caller.
    pub fn walk(
        &mut self,
        target: Option<H::Node>,
        live: Option<H::Node>,
    ) -> Option<Morph<H::Node>> {
        match (target, live) {
            (target, None) => {
                self.stats.walked += 1;
                self.stats.adopted += usize::from(target.is_some());
                trace!(?target, "walk: adopt");
                target.map(Morph::Adopted)
            }
            (None, Some(_live)) => {
                self.stats.walked += 1;
                self.stats.removed += 1;
                trace!(live = ?_live, "walk: remove");
                None
            }
            (Some(target), Some(live)) => Some(self.walk_pair(target, live)),
        }
    }

    /// Reconcile a pair where both nodes are present.
    pub(crate) fn walk_pair(&mut self, target: H::Node, live: H::Node) -> Morph<H::Node> {
        self.stats.walked += 1;

        if self.host.identical(target, live) {
            trace!(?live, "walk: identical");
            self.stats.identical += 1;
            return Morph::Kept(live);
        }

        if !self.host.compatible(target, live) {
            trace!(?target, ?live, "walk: replace");
            return Morph::Replaced(target);
        }

        trace!(?target, ?live, "walk: sync");
        self.host.sync(target, live);
        self.stats.synced += 1;
        self.reconcile_children(live, target);
        Morph::Kept(live)
    }

    /// Make the children of `parent` match the children of `target`.
    pub fn reconcile_children(&mut self, parent: H::Node, target: H::Node) {
        let live: SmallVec<[H::Node; 16]> = self.host.children(parent).collect();
        let wanted: SmallVec<[H::Node; 16]> = self.host.children(target).collect();

        if live == wanted {
            trace!(?parent, "children: identical lists");
            self.stats.fast_paths += 1;
            return;
        }

        match (live.as_slice(), wanted.as_slice()) {
            (&[live_child], &[target_child]) => {
                self.stats.fast_paths += 1;
                if let Morph::Replaced(new) = self.walk_pair(target_child, live_child) {
                    trace!(?parent, ?new, "children: replace single child");
                    self.host.replace_child(parent, new, live_child);
                    self.stats.replaced += 1;
                }
            }
            (_, []) => {
                trace!(?parent, removed = live.len(), "children: clear");
                self.stats.fast_paths += 1;
                self.host.clear_children(parent);
                self.stats.cleared += 1;
                self.stats.deleted += live.len();
            }
            ([], _) => {
                trace!(?parent, appended = wanted.len(), "children: append all");
                self.stats.fast_paths += 1;
                for &child in &wanted {
                    self.host.insert_before(parent, child, None);
                }
                self.stats.inserted += wanted.len();
            }
            _ => {
                let diff = diff_children(&*self.host, &live, &wanted, &self.config);
                match diff.strategy {
                    Strategy::Exact => self.stats.exact_diffs += 1,
                    Strategy::Approximate => self.stats.approximate_diffs += 1,
                }
                self.apply_script(parent, &live, &wanted, &diff.script);
            }
        }
    }
}

/// Reconcile `live` against `target` in `host` with the default
/// configuration, returning the node that now stands for the tree.
///
/// The result is `live` itself unless the roots are incompatible, in which
/// case it is `target` and the caller must substitute it for `live`.
pub fn reconcile<H>(host: &mut H, live: H::Node, target: H::Node) -> Result<H::Node, ReconcileError>
where
    H: TreeMut + NodeSync,
{
    Reconciler::new(host)
        .reconcile(live, target)
        .map(Morph::node)
}
