use facet::Facet;

/// Errors reported by [`Reconciler::reconcile`](crate::Reconciler::reconcile).
///
/// These are contract violations by the caller; they are detected before any
/// mutation happens.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum ReconcileError {
    /// live root is not a node of this tree
    UnknownLiveRoot,

    /// target root is not a node of this tree
    UnknownTargetRoot,
}
