use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::sync::{Arc, Mutex};

pub const PREVIEW_WIDTH: u32 = 640;
pub const PREVIEW_HEIGHT: u32 = 480;

/// Receives every annotated frame for display.
pub trait PreviewSink: Send + Sync {
    fn show(&self, frame: &RgbImage);
}

/// A display-ready preview image, already scaled to the preview size.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Increases by one for every frame handed to the preview.
    pub generation: u64,
}

/// Converts a frame into the RGBA buffer the window uploads as a texture.
pub fn to_preview_frame(frame: &RgbImage, generation: u64) -> PreviewFrame {
    let scaled = imageops::resize(frame, PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::Triangle);
    let rgba = DynamicImage::ImageRgb8(scaled).to_rgba8();
    let (width, height) = rgba.dimensions();
    PreviewFrame {
        rgba: rgba.into_raw(),
        width,
        height,
        generation,
    }
}

/// Preview sink shared between the capture worker and the window.
#[derive(Clone, Default)]
pub struct SharedPreview {
    latest: Arc<Mutex<Option<PreviewFrame>>>,
    repaint: Arc<Mutex<Option<egui::Context>>>,
}

impl SharedPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets new frames wake the window up instead of waiting for the next input event.
    pub fn attach_context(&self, ctx: egui::Context) {
        if let Ok(mut repaint) = self.repaint.lock() {
            *repaint = Some(ctx);
        }
    }

    pub fn latest(&self) -> Option<PreviewFrame> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest
            .lock()
            .ok()
            .and_then(|latest| latest.as_ref().map(|frame| frame.generation))
            .unwrap_or(0)
    }
}

impl PreviewSink for SharedPreview {
    fn show(&self, frame: &RgbImage) {
        let generation = self.latest_generation() + 1;
        let preview = to_preview_frame(frame, generation);

        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(preview);
        }

        if let Ok(repaint) = self.repaint.lock() {
            if let Some(ctx) = repaint.as_ref() {
                ctx.request_repaint();
            }
        }
    }
}
