//! Fake devices and sinks shared by the capture and GUI tests.

use crate::capture::{CameraDevice, CameraOpener, CaptureError, PreviewSink};
use crate::core::CaptureResolution;
use image::RgbImage;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeOpener {
    pub fail_open: bool,
    /// 1-based read number that fails with a frame read error.
    pub fail_read_on: Option<usize>,
    /// 1-based read number that panics, like a misbehaving driver.
    pub panic_read_on: Option<usize>,
    pub opened: Mutex<Vec<(u32, CaptureResolution)>>,
    pub reads: Arc<AtomicUsize>,
    pub released: Arc<AtomicBool>,
}

pub struct FakeCamera {
    resolution: CaptureResolution,
    fail_read_on: Option<usize>,
    panic_read_on: Option<usize>,
    reads: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl CameraOpener for FakeOpener {
    fn open(&self, index: u32, resolution: CaptureResolution) -> Result<Box<dyn CameraDevice>, CaptureError> {
        if self.fail_open {
            return Err(CaptureError::DeviceOpen {
                index,
                message: "no such device".to_string(),
            });
        }
        self.opened.lock().unwrap().push((index, resolution));
        self.released.store(false, Ordering::SeqCst);
        Ok(Box::new(FakeCamera {
            resolution,
            fail_read_on: self.fail_read_on,
            panic_read_on: self.panic_read_on,
            reads: Arc::clone(&self.reads),
            released: Arc::clone(&self.released),
        }))
    }
}

impl CameraDevice for FakeCamera {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.panic_read_on == Some(read) {
            panic!("driver fault on read {}", read);
        }
        if self.fail_read_on == Some(read) {
            return Err(CaptureError::FrameRead("device busy".to_string()));
        }
        Ok(RgbImage::new(self.resolution.width(), self.resolution.height()))
    }
}

impl Drop for FakeCamera {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingPreview {
    pub shown: Mutex<Vec<(u32, u32)>>,
}

impl PreviewSink for RecordingPreview {
    fn show(&self, frame: &RgbImage) {
        self.shown.lock().unwrap().push(frame.dimensions());
    }
}
