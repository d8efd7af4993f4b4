use thiserror::Error;

use crate::types::Size;

/// Caller-contract violations reported by the engine.
///
/// Every other anomalous condition is a defined no-op: draws entirely
/// outside a camera's bounds are dropped, removing an absent static blit
/// does nothing, and scene restores for unknown scenes leave state as is.
#[derive(Debug, Error)]
pub enum CompositingError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("background size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: Size, actual: Size },
}
