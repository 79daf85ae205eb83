#[cfg(test)]
mod tests {

    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use crate::capture::testing::FakeOpener;
    use crate::capture::{CaptureController, CaptureState, SharedPreview};
    use crate::core::{AppConfig, CaptureResolution};
    use crate::gui::app::CameraApp;

    // Test helper to create an app backed by a fake camera
    fn create_test_app(name: &str, opener: Arc<FakeOpener>) -> (CameraApp, PathBuf) {
        let output_directory = std::env::temp_dir().join(format!("fixed-point-camera-app-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&output_directory);

        let mut config = AppConfig::default();
        config.output_directory = output_directory.clone();

        let preview = SharedPreview::new();
        let controller = CaptureController::new(opener, Arc::new(preview.clone()));
        (CameraApp::with_controller(config, controller, preview), output_directory)
    }

    fn wait_for_saved_frame(app: &mut CameraApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.frames_saved == 0 && Instant::now() < deadline {
            app.process_capture_events();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_app_initial_state() {
        let (app, _) = create_test_app("initial", Arc::new(FakeOpener::default()));

        assert_eq!(app.capture_state, CaptureState::Idle);
        assert!(!app.is_capturing());
        assert_eq!(app.status_message, "Status: Not Started");
        assert_eq!(app.interval_input, "1");
        assert_eq!(app.selected_resolution, CaptureResolution::Vga);
        assert!(app.preview_texture.is_none());
        assert!(!app.persist_config);
    }

    #[test]
    fn test_invalid_interval_does_not_touch_camera() {
        let opener = Arc::new(FakeOpener::default());
        let (mut app, _) = create_test_app("bad-interval", opener.clone());

        app.interval_input = "zero".to_string();
        app.start_capture();

        assert!(!app.is_capturing());
        assert!(app.status_message.contains("whole number of minutes"));
        assert!(opener.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_camera_open_failure_queues_error_dialog() {
        let opener = Arc::new(FakeOpener {
            fail_open: true,
            ..Default::default()
        });
        let (mut app, output_directory) = create_test_app("open-failure", opener);

        app.start_capture();

        assert!(!app.is_capturing());
        assert_eq!(app.pending_error.as_deref(), Some("Failed to open camera."));
        assert_eq!(app.status_message, "Status: Failed to open camera");

        let _ = std::fs::remove_dir_all(&output_directory);
    }

    #[test]
    fn test_start_and_stop_follow_controller_state() {
        let opener = Arc::new(FakeOpener::default());
        let (mut app, output_directory) = create_test_app("start-stop", opener.clone());

        app.selected_resolution = CaptureResolution::Hd;
        app.interval_input = "5".to_string();
        app.start_capture();

        assert!(app.is_capturing());
        assert_eq!(*opener.opened.lock().unwrap(), vec![(0, CaptureResolution::Hd)]);
        assert_eq!(app.config.resolution, CaptureResolution::Hd);
        assert_eq!(app.config.interval_minutes, 5);

        wait_for_saved_frame(&mut app);
        assert_eq!(app.frames_saved, 1);
        let saved = app.last_saved.clone().expect("a frame should have been saved");
        assert!(saved.starts_with(&output_directory));
        assert!(saved.to_string_lossy().ends_with("_1.jpg"));

        app.stop_capture();
        assert!(!app.is_capturing());
        assert_eq!(app.status_message, "Status: Stopped");
        assert!(opener.released.load(std::sync::atomic::Ordering::SeqCst));

        let _ = std::fs::remove_dir_all(&output_directory);
    }

    #[test]
    fn test_preview_texture_follows_latest_frame() {
        let opener = Arc::new(FakeOpener::default());
        let (mut app, output_directory) = create_test_app("preview", opener);
        let ctx = egui::Context::default();

        app.update_preview_texture(&ctx);
        assert!(app.preview_texture.is_none());

        app.start_capture();
        wait_for_saved_frame(&mut app);
        app.update_preview_texture(&ctx);
        app.stop_capture();

        let texture = app.preview_texture.as_ref().expect("preview texture should be loaded");
        assert_eq!(texture.size(), [640, 480]);
        assert_eq!(app.preview_generation, 1);

        let _ = std::fs::remove_dir_all(&output_directory);
    }

    #[test]
    fn test_start_request_shows_starting_status_before_opening_camera() {
        let opener = Arc::new(FakeOpener::default());
        let (mut app, output_directory) = create_test_app("deferred-start", opener.clone());

        assert!(!app.run_requested_start());

        app.request_start();
        assert!(app.start_requested);
        assert_eq!(app.status_message, "Status: Starting camera...");
        assert!(opener.opened.lock().unwrap().is_empty());

        assert!(app.run_requested_start());
        assert!(!app.start_requested);
        assert!(app.is_capturing());
        assert_eq!(opener.opened.lock().unwrap().len(), 1);

        // Already running, so a further request is ignored.
        app.request_start();
        assert!(!app.start_requested);

        app.stop_capture();
        let _ = std::fs::remove_dir_all(&output_directory);
    }
}
