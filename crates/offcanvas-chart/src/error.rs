use thiserror::Error;

/// Errors surfaced by the chart layer.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The drawing surface could not be detached from its window.
    #[error("offscreen rendering is not supported here: {0}")]
    Unsupported(String),

    /// The drawing surface has already been handed over.
    #[error("drawing surface was already transferred")]
    AlreadyTransferred,

    /// Adapter, device or surface setup failed on the renderer thread.
    #[error("gpu setup failed: {0}")]
    Gpu(String),

    /// The surface became unusable while rendering.
    #[error("surface lost beyond recovery")]
    Fatal,

    /// The other end of the renderer channel is gone.
    #[error("renderer channel disconnected")]
    Disconnected,

    /// The renderer thread could not be started.
    #[error("failed to spawn renderer thread")]
    Spawn(#[from] std::io::Error),
}

impl ChartError {
    /// Whether the render loop should stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChartError::Fatal | ChartError::Disconnected)
    }
}
