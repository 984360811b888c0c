use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timeline width must be positive, got {0}")]
    InvalidWidth(i32),

    #[error("Invalid range: start {start}, end {end}, width {width}")]
    InvalidRange { start: i32, end: i32, width: i32 },

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
