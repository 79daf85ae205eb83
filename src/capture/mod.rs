pub mod annotator;
pub mod controller;
pub mod device;
pub mod error;
pub mod font;
pub mod preview;
pub mod scheduler;
pub mod writer;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
mod annotator_test;

pub use controller::*;
pub use device::{CameraDevice, CameraOpener, NokhwaOpener};
pub use error::CaptureError;
pub use preview::{PreviewSink, SharedPreview};
