//! Error types for the core vocabulary.

/// Errors decoding a partition handshake from its wire form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The handshake did not carry exactly the expected number of words.
    #[error("handshake has {got} words, expected {expected}")]
    Arity {
        /// Expected word count.
        expected: usize,
        /// Received word count.
        got: usize,
    },
    /// A dimension field was zero or negative.
    #[error("handshake field '{field}' must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The received value.
        value: i64,
    },
    /// `xdim * ydim` does not fit in a `usize`.
    #[error("handshake block grid {xdim} x {ydim} overflows the worker count")]
    GridOverflow {
        /// Received `xdim`.
        xdim: usize,
        /// Received `ydim`.
        ydim: usize,
    },
    /// A neighbor field was neither the sentinel nor a valid rank.
    #[error("handshake neighbor '{field}' = {value} is not a rank in 0..{workers}")]
    BadNeighbor {
        /// Name of the offending field.
        field: &'static str,
        /// The received value.
        value: i64,
        /// Worker count implied by `xdim * ydim`.
        workers: usize,
    },
}
