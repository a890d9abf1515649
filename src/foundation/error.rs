/// Convenience result type used across penbot APIs.
pub type PenResult<T> = Result<T, PenError>;

/// Top-level error type for penbot operations.
#[derive(thiserror::Error, Debug)]
pub enum PenError {
    /// Invalid configuration (canvas size, motion profile, CLI overrides).
    #[error("config error: {0}")]
    Config(String),

    /// An incoming message could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The command channel consumer is gone.
    #[error("channel error: {0}")]
    Channel(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// A sprite or snapshot file could not be read or written.
    #[error("asset error: {0}")]
    Asset(String),

    /// Socket or filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// WebSocket transport failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Catch-all wrapper for contextual errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PenError {
    /// Build a [`PenError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PenError::Protocol`].
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`PenError::Channel`].
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Build a [`PenError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PenError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
