use thiserror::Error;
use trimbar_core::error::CoreError;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to start mpv: {0}")]
    Spawn(std::io::Error),

    #[error("mpv socket did not appear")]
    SocketTimeout,

    #[error("failed to connect to mpv: {0}")]
    Connect(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("mpv error: {0}")]
    Mpv(String),

    #[error("mpv property unavailable: {0}")]
    MissingProperty(&'static str),
}

impl From<PreviewError> for CoreError {
    fn from(e: PreviewError) -> Self {
        CoreError::Playback(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
