use crate::capture::device::{CameraDevice, CameraOpener};
use crate::capture::preview::PreviewSink;
use crate::capture::scheduler::{panic_message, PeriodicJob};
use crate::capture::{annotator, writer, CaptureError};
use crate::core::{AppConfig, CaptureResolution};
use chrono::Local;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Running,
}

#[derive(Debug, Clone)]
pub enum CaptureEvent {
    StateChanged(CaptureState),
    FrameSaved { counter: u64, path: PathBuf },
    TickFailed { counter: u64, message: String },
}

/// Everything a session needs, fixed for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub device_index: u32,
    pub resolution: CaptureResolution,
    pub interval: Duration,
    pub output_directory: PathBuf,
    pub jpeg_quality: u8,
}

impl CaptureSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            device_index: config.device_index,
            resolution: config.resolution,
            interval: config.interval(),
            output_directory: config.output_directory.clone(),
            jpeg_quality: config.jpeg_quality,
        }
    }

    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.interval.is_zero() {
            return Err(CaptureError::InvalidSettings("capture interval must be greater than zero".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CaptureError::InvalidSettings(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        std::fs::create_dir_all(&self.output_directory).map_err(|source| CaptureError::Io {
            path: self.output_directory.clone(),
            source,
        })?;
        Ok(())
    }
}

struct CaptureSession {
    device: Box<dyn CameraDevice>,
    counter: u64,
}

/// What every tick writes to; shared with the job thread.
struct TickSinks {
    output_directory: PathBuf,
    jpeg_quality: u8,
    preview: Arc<dyn PreviewSink>,
    events: broadcast::Sender<CaptureEvent>,
}

pub struct CaptureController {
    opener: Arc<dyn CameraOpener>,
    preview: Arc<dyn PreviewSink>,
    job: Option<PeriodicJob>,
    event_sender: broadcast::Sender<CaptureEvent>,
}

impl CaptureController {
    pub fn new(opener: Arc<dyn CameraOpener>, preview: Arc<dyn PreviewSink>) -> Self {
        let (event_sender, _) = broadcast::channel(64);
        Self {
            opener,
            preview,
            job: None,
            event_sender,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.event_sender.subscribe()
    }

    pub fn state(&self) -> CaptureState {
        if self.job.as_ref().map_or(false, PeriodicJob::is_running) {
            CaptureState::Running
        } else {
            CaptureState::Idle
        }
    }

    /// Opens the camera and arms the capture job. The first tick runs right away.
    /// Starting while a session is running does nothing.
    pub fn start(&mut self, settings: CaptureSettings) -> Result<(), CaptureError> {
        if self.state() == CaptureState::Running {
            log::debug!("Capture already running, ignoring start request");
            return Ok(());
        }

        settings.validate()?;

        log::info!(
            "Starting capture: camera {} at {}, every {:?}, into {}",
            settings.device_index,
            settings.resolution.label(),
            settings.interval,
            settings.output_directory.display()
        );

        let opener = Arc::clone(&self.opener);
        let setup_events = self.event_sender.clone();
        let device_index = settings.device_index;
        let resolution = settings.resolution;
        let setup = move || -> Result<CaptureSession, CaptureError> {
            let device = opener.open(device_index, resolution)?;
            let _ = setup_events.send(CaptureEvent::StateChanged(CaptureState::Running));
            Ok(CaptureSession { device, counter: 1 })
        };

        let sinks = TickSinks {
            output_directory: settings.output_directory.clone(),
            jpeg_quality: settings.jpeg_quality,
            preview: Arc::clone(&self.preview),
            events: self.event_sender.clone(),
        };

        match PeriodicJob::spawn("capture", settings.interval, setup, move |session| {
            run_tick(session, &sinks)
        }) {
            Ok(job) => {
                self.job = Some(job);
                Ok(())
            }
            Err(e) => {
                log::error!("{}", e);
                Err(e)
            }
        }
    }

    /// Cancels the job and releases the camera. Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(mut job) = self.job.take() {
            job.stop();
            log::info!("Capture stopped");
            let _ = self.event_sender.send(CaptureEvent::StateChanged(CaptureState::Idle));
        }
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_tick(session: &mut CaptureSession, sinks: &TickSinks) {
    let counter = session.counter;
    session.counter += 1;

    let timestamp = writer::format_timestamp(&Local::now());

    let device = session.device.as_mut();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| capture_frame(device, sinks, &timestamp, counter)))
        .unwrap_or_else(|payload| Err(CaptureError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(path) => {
            log::info!("Saved frame {} to {}", counter, path.display());
            let _ = sinks.events.send(CaptureEvent::FrameSaved { counter, path });
        }
        Err(e) => {
            log::error!("Capture {} failed: {}", counter, e);
            let _ = sinks.events.send(CaptureEvent::TickFailed {
                counter,
                message: e.to_string(),
            });
        }
    }
}

fn capture_frame(
    device: &mut dyn CameraDevice,
    sinks: &TickSinks,
    timestamp: &str,
    counter: u64,
) -> Result<PathBuf, CaptureError> {
    let mut frame = device.read_frame()?;
    let placement = annotator::annotate(&mut frame, &writer::stamp_text(timestamp, counter));
    log::debug!(
        "Stamped frame {} at ({}, {})-({}, {})",
        counter,
        placement.x,
        placement.y,
        placement.right(),
        placement.bottom()
    );

    let saved = writer::save(&frame, &sinks.output_directory, timestamp, counter, sinks.jpeg_quality);
    sinks.preview.show(&frame);
    saved
}
