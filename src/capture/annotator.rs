use crate::capture::font;
use image::{Rgb, RgbImage};

/// Distance in pixels between the stamp and the right/bottom frame edges.
pub const TEXT_MARGIN: u32 = 10;
pub const TEXT_SCALE: u32 = 4;
pub const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Bounding box of a stamp in frame pixel coordinates. `x`/`y` may be negative
/// when the text is larger than the frame; drawing clips to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl TextPlacement {
    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }
}

pub fn text_placement(frame_width: u32, frame_height: u32, text: &str) -> TextPlacement {
    let (width, height) = font::text_size(text, TEXT_SCALE);
    TextPlacement {
        x: frame_width as i64 - TEXT_MARGIN as i64 - width as i64,
        y: frame_height as i64 - TEXT_MARGIN as i64 - height as i64,
        width,
        height,
    }
}

/// Burns `text` into the bottom-right corner of `frame`.
pub fn annotate(frame: &mut RgbImage, text: &str) -> TextPlacement {
    let (frame_width, frame_height) = frame.dimensions();
    let placement = text_placement(frame_width, frame_height, text);

    for (unit_x, unit_y) in font::lit_pixels(text) {
        let block_x = placement.x + (unit_x * TEXT_SCALE) as i64;
        let block_y = placement.y + (unit_y * TEXT_SCALE) as i64;
        fill_block(frame, block_x, block_y, TEXT_SCALE);
    }

    placement
}

fn fill_block(frame: &mut RgbImage, x: i64, y: i64, size: u32) {
    let (frame_width, frame_height) = frame.dimensions();
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + size as i64).min(frame_width as i64);
    let y_end = (y + size as i64).min(frame_height as i64);

    for py in y_start..y_end {
        for px in x_start..x_end {
            frame.put_pixel(px as u32, py as u32, TEXT_COLOR);
        }
    }
}
