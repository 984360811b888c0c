use crate::error::{CoreError, Result};
use crate::types::{DialogSize, Px};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSettings {
    /// Pixel span of the timeline track. Fixed for the session's lifetime.
    pub width: Px,
    pub comment_dialog: DialogSize,
}

impl SessionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 {
            return Err(CoreError::InvalidWidth(self.width));
        }
        let DialogSize { width, height } = self.comment_dialog;
        if width == 0 || height == 0 {
            return Err(CoreError::Dialog(format!(
                "comment dialog size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    /// Save settings as pretty-printed JSON.
    /// Automatically appends `.trimbar` extension if not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let settings: SessionSettings = serde_json::from_str(&data)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        preset_default()
    }
}

/// 1024 px track with a 350x300 comment dialog.
pub fn preset_default() -> SessionSettings {
    SessionSettings {
        width: 1024,
        comment_dialog: DialogSize {
            width: 350,
            height: 300,
        },
    }
}

/// Full-HD wide track.
pub fn preset_wide() -> SessionSettings {
    SessionSettings {
        width: 1920,
        ..preset_default()
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("trimbar") {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".trimbar");
        p.set_file_name(name);
        p
    }
}
