//! Producer-boundary error types.

use thiserror::Error;

/// Result type alias for payload decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reasons a producer payload is rejected before it reaches the buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid payload JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload has an empty metric id")]
    EmptyMetric,

    #[error("payload value for {metric} is not finite")]
    NonFiniteValue { metric: String },
}
