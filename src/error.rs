//! Error types for tola-reconcile.
//!
//! Host failures are carried through untouched; the only error the
//! reconciler raises itself is a [`StructuralError`].

use thiserror::Error;

/// Malformed node description detected while realizing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A composite node was built with an empty tag.
    #[error("invalid node description: element is missing its tag")]
    MissingTag,
}

/// Errors that can occur while reconciling against a host of error type `E`.
#[derive(Debug, Error)]
pub enum ReconcileError<E> {
    /// The description cannot be realized.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A host capability failed. Passed through as-is.
    #[error(transparent)]
    Host(E),
}

/// Result type alias for reconciliation operations.
pub type ReconcileResult<T, E> = Result<T, ReconcileError<E>>;

impl<E> ReconcileError<E> {
    /// Wrap a host failure.
    #[inline]
    pub fn host(err: E) -> Self {
        Self::Host(err)
    }

    /// Check if this error came from the host.
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }

    /// Get the host failure, if that is what this is.
    pub fn into_host(self) -> Option<E> {
        match self {
            Self::Host(err) => Some(err),
            Self::Structural(_) => None,
        }
    }
}
