use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to open camera {index}: {message}")]
    DeviceOpen { index: u32, message: String },

    #[error("Failed to read frame: {0}")]
    FrameRead(String),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid capture settings: {0}")]
    InvalidSettings(String),

    #[error("Capture panicked: {0}")]
    Panicked(String),
}

impl CaptureError {
    pub fn is_device_open(&self) -> bool {
        matches!(self, CaptureError::DeviceOpen { .. })
    }
}
