use eframe::egui;
use crate::capture::preview::{PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::capture::{
    CaptureController, CaptureEvent, CaptureSettings, CaptureState, NokhwaOpener, SharedPreview,
};
use crate::core::{minutes_to_interval, parse_interval_minutes, AppConfig, CaptureResolution};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct CameraApp {
    pub config: AppConfig,
    pub controller: CaptureController,
    pub event_receiver: broadcast::Receiver<CaptureEvent>,
    pub preview: SharedPreview,
    pub preview_texture: Option<egui::TextureHandle>,
    pub preview_generation: u64,
    /// Mirrors the controller state, updated from controller events.
    pub capture_state: CaptureState,
    pub selected_resolution: CaptureResolution,
    pub interval_input: String,
    pub status_message: String,
    pub frames_saved: u64,
    pub last_saved: Option<PathBuf>,
    /// Shown as a blocking dialog on the next frame.
    pub pending_error: Option<String>,
    /// Whether the chosen resolution and interval are written back to the config file.
    pub persist_config: bool,
    /// Set by the Start button; the blocking start runs on the following frame
    /// so the "Starting" status is on screen while the camera opens.
    pub start_requested: bool,
}

impl CameraApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = AppConfig::load()?;
        if let Err(e) = config.ensure_output_directory() {
            log::warn!("Output directory is not ready yet: {}", e);
        }

        let preview = SharedPreview::new();
        preview.attach_context(cc.egui_ctx.clone());

        let controller = CaptureController::new(Arc::new(NokhwaOpener), Arc::new(preview.clone()));

        let mut app = Self::with_controller(config, controller, preview);
        app.persist_config = true;
        Ok(app)
    }

    pub fn with_controller(config: AppConfig, controller: CaptureController, preview: SharedPreview) -> Self {
        let event_receiver = controller.subscribe();
        let capture_state = controller.state();

        Self {
            selected_resolution: config.resolution,
            interval_input: config.interval_minutes.to_string(),
            config,
            controller,
            event_receiver,
            preview,
            preview_texture: None,
            preview_generation: 0,
            capture_state,
            status_message: "Status: Not Started".to_string(),
            frames_saved: 0,
            last_saved: None,
            pending_error: None,
            persist_config: false,
            start_requested: false,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_state == CaptureState::Running
    }

    pub fn request_start(&mut self) {
        if self.is_capturing() || self.start_requested {
            return;
        }
        self.start_requested = true;
        self.status_message = "Status: Starting camera...".to_string();
    }

    /// Runs a start queued by [`CameraApp::request_start`]. Returns whether one ran.
    pub fn run_requested_start(&mut self) -> bool {
        if !std::mem::take(&mut self.start_requested) {
            return false;
        }
        self.start_capture();
        true
    }

    pub fn start_capture(&mut self) {
        let interval_minutes = match parse_interval_minutes(&self.interval_input) {
            Ok(minutes) => minutes,
            Err(e) => {
                log::warn!("Rejected interval input: {}", e);
                self.status_message = format!("Status: {}", e);
                return;
            }
        };

        let settings = CaptureSettings {
            resolution: self.selected_resolution,
            interval: minutes_to_interval(interval_minutes),
            ..CaptureSettings::from_config(&self.config)
        };

        match self.controller.start(settings) {
            Ok(()) => {
                self.frames_saved = 0;
                self.status_message = "Status: Started".to_string();

                self.config.resolution = self.selected_resolution;
                self.config.interval_minutes = interval_minutes;
                if self.persist_config {
                    if let Err(e) = self.config.save() {
                        log::warn!("Failed to remember capture settings: {}", e);
                    }
                }
            }
            Err(e) if e.is_device_open() => {
                self.status_message = "Status: Failed to open camera".to_string();
                self.pending_error = Some("Failed to open camera.".to_string());
            }
            Err(e) => {
                self.status_message = format!("Status: {}", e);
            }
        }

        self.process_capture_events();
    }

    pub fn stop_capture(&mut self) {
        self.controller.stop();
        self.process_capture_events();
        self.status_message = "Status: Stopped".to_string();
    }

    pub fn process_capture_events(&mut self) {
        loop {
            match self.event_receiver.try_recv() {
                Ok(CaptureEvent::StateChanged(state)) => {
                    log::debug!("Capture state changed to {:?}", state);
                    self.capture_state = state;
                }
                Ok(CaptureEvent::FrameSaved { counter, path }) => {
                    self.frames_saved += 1;
                    self.status_message = format!(
                        "Status: Saved #{} ({})",
                        counter,
                        path.file_name().unwrap_or_default().to_string_lossy()
                    );
                    self.last_saved = Some(path);
                }
                Ok(CaptureEvent::TickFailed { counter, message }) => {
                    self.status_message = format!("Status: Capture #{} failed: {}", counter, message);
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Missed {} capture events", skipped);
                }
                Err(_) => break,
            }
        }
    }

    pub fn update_preview_texture(&mut self, ctx: &egui::Context) {
        if self.preview.latest_generation() == self.preview_generation {
            return;
        }

        if let Some(frame) = self.preview.latest() {
            if frame.rgba.len() == (frame.width * frame.height * 4) as usize {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [frame.width as usize, frame.height as usize],
                    &frame.rgba,
                );
                self.preview_texture = Some(ctx.load_texture(
                    "camera_preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            self.preview_generation = frame.generation;
        }
    }

    fn show_error_dialog(&mut self) {
        if let Some(message) = self.pending_error.take() {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Error")
                .set_description(message)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }
}

impl eframe::App for CameraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_requested_start();
        self.process_capture_events();
        self.update_preview_texture(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let capturing = self.is_capturing();
                let idle = !capturing && !self.start_requested;

                if ui.add_enabled(idle, egui::Button::new("▶ Start capture")).clicked() {
                    self.request_start();
                    ctx.request_repaint();
                }
                if ui.add_enabled(capturing, egui::Button::new("⏹ Stop capture")).clicked() {
                    self.stop_capture();
                }

                ui.separator();

                ui.add_enabled_ui(idle, |ui| {
                    ui.label("Resolution:");
                    egui::ComboBox::from_id_source("resolution")
                        .selected_text(self.selected_resolution.label())
                        .show_ui(ui, |ui| {
                            for resolution in CaptureResolution::ALL {
                                ui.selectable_value(&mut self.selected_resolution, resolution, resolution.label());
                            }
                        });

                    ui.label("Interval (minutes):");
                    ui.add(egui::TextEdit::singleline(&mut self.interval_input).desired_width(40.0));
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("📁 {}", self.config.output_directory.display()));
                    if self.is_capturing() {
                        ui.label(format!("{} saved", self.frames_saved));
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                if let Some(texture) = &self.preview_texture {
                    ui.add(
                        egui::Image::new(texture)
                            .fit_to_exact_size(egui::vec2(PREVIEW_WIDTH as f32, PREVIEW_HEIGHT as f32)),
                    );
                } else if self.is_capturing() {
                    ui.label("Waiting for the first frame...");
                } else {
                    ui.label("Press Start capture to begin");
                }
            });
        });

        self.show_error_dialog();

        // Repaint while capturing so state and status changes show up promptly.
        if self.is_capturing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.stop();
    }
}
