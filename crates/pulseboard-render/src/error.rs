//! Render engine error types.

use pulseboard_core::SurfaceError;
use thiserror::Error;

/// Errors that can occur on the render side.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render: {0}")]
    ContextUnavailable(#[from] SurfaceError),

    #[error("render engine already initialized")]
    AlreadyInitialized,

    #[error("render thread error: {0}")]
    Thread(String),
}

impl RenderError {
    /// Fatal errors end the render thread; the rest are logged and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::ContextUnavailable(_) | RenderError::Thread(_))
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
