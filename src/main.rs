mod capture;
mod core;
mod gui;

use eframe::egui;
use gui::CameraApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // AVFoundation needs camera permission before the first device is opened.
    #[cfg(target_os = "macos")]
    nokhwa::nokhwa_initialize(|granted| {
        if !granted {
            log::error!("Camera access was not granted");
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 620.0])
            .with_title("Fixed-Point Camera"),
        ..Default::default()
    };

    eframe::run_native(
        "Fixed-Point Camera",
        options,
        Box::new(|cc| {
            match CameraApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    eprintln!("Failed to initialize app: {}", e);
                    std::process::exit(1);
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
