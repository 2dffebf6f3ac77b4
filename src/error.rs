//! Error types for the rover-voice pipeline.

/// Top-level error type for the voice command system.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Streaming recognition session error.
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Movement service request error (transport or non-2xx response).
    #[error("movement service error: {0}")]
    Api(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, VoiceError>;
