use crate::color::ColorScheme;
use crate::settings::{bounded, FieldSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Braille dots per logical unit (a dot is roughly 4 pixels wide)
pub const DEFAULT_PIXEL_RATIO: f32 = 0.25;

/// Complete application configuration for export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// All particle field settings
    pub settings: FieldSettings,
    /// Color scheme (app-level)
    pub color_scheme: ColorScheme,
    /// Braille dots per logical unit
    pub pixel_ratio: f32,
    /// Start without the sidebar
    pub fullscreen: bool,
}

impl AppConfig {
    /// Export config to a JSON file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file; out-of-range values are clamped
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.sanitize();
        Ok(config)
    }

    /// Clamp settings and pixel ratio to the ranges the canvas can rasterize
    pub fn sanitize(&mut self) {
        self.settings.sanitize();
        self.pixel_ratio = bounded(self.pixel_ratio, 0.05, 4.0, DEFAULT_PIXEL_RATIO);
    }

    /// `<config dir>/particle-field/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("particle-field").join("config.json"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: FieldSettings::default(),
            color_scheme: ColorScheme::default(),
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            fullscreen: false,
        }
    }
}
