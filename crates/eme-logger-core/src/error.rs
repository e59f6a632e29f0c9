//! Error types for message flattening.

use thiserror::Error;

/// Errors while flattening a value into a [`LogItem`](crate::LogItem).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// A structured value was reached again while it was still being
    /// flattened.
    #[error("Cycle detected at '{path}'")]
    CycleDetected {
        /// Field path of the repeated reference, rooted at `$`.
        path: String,
    },

    /// Nesting went deeper than the configured limit.
    #[error("Maximum depth {limit} exceeded at '{path}'")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
        /// Field path where the limit was crossed, rooted at `$`.
        path: String,
    },
}

/// Result type alias for flattening operations.
pub type FlattenResult<T> = std::result::Result<T, FlattenError>;
