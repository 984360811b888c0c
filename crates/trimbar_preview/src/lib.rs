pub mod error;
pub mod mpv;

pub use error::{PreviewError, Result};
pub use mpv::MpvPlayer;
