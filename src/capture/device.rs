use crate::capture::CaptureError;
use crate::core::CaptureResolution;
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

/// An open camera. Lives on the capture worker thread for the whole session
/// and releases the device when dropped.
pub trait CameraDevice {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError>;
}

/// Opens camera devices. Called on the capture worker thread.
pub trait CameraOpener: Send + Sync {
    fn open(&self, index: u32, resolution: CaptureResolution) -> Result<Box<dyn CameraDevice>, CaptureError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NokhwaOpener;

impl CameraOpener for NokhwaOpener {
    fn open(&self, index: u32, resolution: CaptureResolution) -> Result<Box<dyn CameraDevice>, CaptureError> {
        let camera = NokhwaCamera::open(index, resolution)?;
        Ok(Box::new(camera))
    }
}

pub struct NokhwaCamera {
    camera: Camera,
    index: u32,
}

impl NokhwaCamera {
    pub fn open(index: u32, resolution: CaptureResolution) -> Result<Self, CaptureError> {
        let format = CameraFormat::new(
            Resolution::new(resolution.width(), resolution.height()),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| CaptureError::DeviceOpen { index, message: e.to_string() })?;

        if let Err(e) = camera.set_resolution(Resolution::new(resolution.width(), resolution.height())) {
            log::warn!("Camera {} rejected resolution {}: {}", index, resolution.label(), e);
        }

        camera
            .open_stream()
            .map_err(|e| CaptureError::DeviceOpen { index, message: e.to_string() })?;

        let actual = camera.resolution();
        log::info!(
            "Opened camera {} at {}x{} (requested {})",
            index,
            actual.width(),
            actual.height(),
            resolution.label()
        );

        Ok(Self { camera, index })
    }
}

impl CameraDevice for NokhwaCamera {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::FrameRead(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::FrameRead(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| CaptureError::FrameRead(format!("Decoded buffer does not match {}x{}", width, height)))
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("Failed to stop camera {} stream: {}", self.index, e);
        } else {
            log::debug!("Released camera {}", self.index);
        }
    }
}
