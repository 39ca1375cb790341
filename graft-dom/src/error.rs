use facet::Facet;
use graft::ReconcileError;

/// Errors that can occur while editing or morphing a [`Document`](crate::Document).
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DomError {
    /// node is not part of this document
    UnknownNode,

    /// node is not an element
    NotAnElement,

    /// {kind} nodes cannot have children
    CannotHaveChildren { kind: String },

    /// a node cannot be appended to its own subtree
    Cycle,

    /// reconciliation failed: {error}
    Reconcile { error: ReconcileError },
}

impl From<ReconcileError> for DomError {
    fn from(error: ReconcileError) -> Self {
        DomError::Reconcile { error }
    }
}
