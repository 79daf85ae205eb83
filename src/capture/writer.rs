use crate::capture::CaptureError;
use chrono::{DateTime, TimeZone};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Text burned into a frame: `<timestamp>_<counter>`.
pub fn stamp_text(timestamp: &str, counter: u64) -> String {
    format!("{}_{}", timestamp, counter)
}

pub fn file_name(timestamp: &str, counter: u64) -> String {
    format!("{}.jpg", stamp_text(timestamp, counter))
}

/// Encodes `frame` as JPEG into `directory` and returns the written path.
pub fn save(
    frame: &RgbImage,
    directory: &Path,
    timestamp: &str,
    counter: u64,
    quality: u8,
) -> Result<PathBuf, CaptureError> {
    let path = directory.join(file_name(timestamp, counter));

    let file = File::create(&path).map_err(|source| CaptureError::Io {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    frame.write_with_encoder(encoder)?;
    writer.flush().map_err(|source| CaptureError::Io {
        path: path.clone(),
        source,
    })?;

    log::debug!("Wrote {}x{} frame to {}", frame.width(), frame.height(), path.display());
    Ok(path)
}
