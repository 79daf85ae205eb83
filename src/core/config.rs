use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Resolutions offered by the capture settings panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureResolution {
    #[default]
    Vga,
    Hd,
    FullHd,
}

impl CaptureResolution {
    pub const ALL: [CaptureResolution; 3] = [
        CaptureResolution::Vga,
        CaptureResolution::Hd,
        CaptureResolution::FullHd,
    ];

    pub fn width(self) -> u32 {
        match self {
            CaptureResolution::Vga => 640,
            CaptureResolution::Hd => 1280,
            CaptureResolution::FullHd => 1920,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            CaptureResolution::Vga => 480,
            CaptureResolution::Hd => 720,
            CaptureResolution::FullHd => 1080,
        }
    }

    pub fn label(self) -> String {
        format!("{}x{}", self.width(), self.height())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub device_index: u32,
    pub output_directory: PathBuf,
    pub resolution: CaptureResolution,
    pub interval_minutes: u32,
    pub jpeg_quality: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        let output_directory = dirs::picture_dir()
            .map(|dir| dir.join("fixed-point-camera"))
            .unwrap_or_else(|| PathBuf::from("./capture"));

        Self {
            device_index: 0,
            output_directory,
            resolution: CaptureResolution::default(),
            interval_minutes: 1,
            jpeg_quality: 90,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", config_path.display(), e))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!("Config file exists but has issues ({}), creating new one with defaults", e);
                    let new_config = Self::default();
                    new_config.save()
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config.save()
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fixed-point-camera")
            .join("config.json")
    }

    pub fn ensure_output_directory(&self) -> anyhow::Result<()> {
        if let Err(e) = std::fs::create_dir_all(&self.output_directory) {
            log::error!("Failed to create output directory {}: {}", self.output_directory.display(), e);
            return Err(anyhow::anyhow!("Failed to create output directory {}: {}", self.output_directory.display(), e));
        }
        log::debug!("Output directory ensured: {}", self.output_directory.display());
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        minutes_to_interval(self.interval_minutes)
    }
}

pub fn minutes_to_interval(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

/// Parses the interval text field. Only positive whole minutes are accepted.
pub fn parse_interval_minutes(input: &str) -> anyhow::Result<u32> {
    let trimmed = input.trim();
    let minutes: u32 = trimmed
        .parse()
        .map_err(|_| anyhow::anyhow!("Interval must be a whole number of minutes, got \"{}\"", trimmed))?;
    if minutes == 0 {
        return Err(anyhow::anyhow!("Interval must be at least 1 minute"));
    }
    Ok(minutes)
}
