//! Grid-specific error types.

/// Errors from grid construction and region transfers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A buffer could not be allocated.
    #[error("allocation of {cells} cells failed")]
    AllocationFailed {
        /// Number of `f32` cells requested.
        cells: usize,
    },
    /// Data handed to a grid or region did not match its shape.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch {
        /// Number of values the target expects.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}
