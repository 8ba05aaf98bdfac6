//! Error types for the count pipeline.

/// Errors that can abort a count aggregation.
#[derive(Debug, thiserror::Error)]
pub enum DpError {
    /// Invalid parameter or parameter combination.
    #[error("invalid parameter: {msg}")]
    InvalidParameters {
        /// Human-readable error description.
        msg: String,
    },

    /// The budget accountant cannot grant the requested slice.
    #[error(
        "insufficient privacy budget: requested (eps={requested_epsilon:.6}, \
         delta={requested_delta:.2e}), remaining (eps={remaining_epsilon:.6}, \
         delta={remaining_delta:.2e})"
    )]
    InsufficientBudget {
        /// Epsilon requested from the ledger.
        requested_epsilon: f64,
        /// Delta requested from the ledger.
        requested_delta: f64,
        /// Epsilon still available in the ledger.
        remaining_epsilon: f64,
        /// Delta still available in the ledger.
        remaining_delta: f64,
    },

}

/// Result type for count pipeline operations.
pub type Result<T> = std::result::Result<T, DpError>;

impl DpError {
    /// Create an invalid parameter error.
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameters { msg: msg.into() }
    }
}
