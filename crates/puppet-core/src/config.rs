//! Runtime settings and their YAML persistence.

use crate::path::PathConfig;
use crate::validate::PixelFormatPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Pacing of synthesized input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Sleep after each mouse action.
    pub mouse_delay_ms: u64,
    /// Sleep after each key action, and between typed characters.
    pub keyboard_delay_ms: u64,
    pub double_click_interval_ms: u64,
    /// Speed used by drags and smooth moves when the caller gives none.
    pub default_smooth_speed: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mouse_delay_ms: 10,
            keyboard_delay_ms: 10,
            double_click_interval_ms: 200,
            default_smooth_speed: 3.0,
        }
    }
}

/// Resource teardown timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    pub teardown_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            teardown_timeout_ms: 1000,
            poll_interval_ms: 1,
        }
    }
}

impl ResourceSettings {
    pub fn teardown_timeout(&self) -> Duration {
        Duration::from_millis(self.teardown_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// All settings of a `Robot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub path: PathConfig,
    pub resources: ResourceSettings,
    pub pixel_format: PixelFormatPolicy,
    /// X display to open instead of `$DISPLAY`. Ignored off X11.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_display_name: Option<String>,
}

/// Directory holding the settings file.
pub fn config_dir() -> PathBuf {
    let base = dirs_next::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("puppet")
}

/// Default settings file location.
pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.yaml")
}

impl Settings {
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_yaml(&content)?;
        debug!(path = ?path.as_ref(), "Loaded settings");
        Ok(settings)
    }

    /// Write the settings, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
                info!(?dir, "Created config directory");
            }
        }
        fs::write(path, self.to_yaml()?)?;
        info!(?path, "Saved settings");
        Ok(())
    }

    /// Load from the default location. Missing or unreadable files give defaults.
    pub fn load_or_default() -> Self {
        Self::load_from_or_default(settings_file_path())
    }

    pub fn load_from_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(?path, "No settings file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(?path, error = %e, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("puppet-config-{}-{name}", std::process::id()))
            .join("settings.yaml")
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.input.mouse_delay_ms, 10);
        assert_eq!(s.input.keyboard_delay_ms, 10);
        assert_eq!(s.input.double_click_interval_ms, 200);
        assert_eq!(s.input.default_smooth_speed, 3.0);
        assert_eq!(s.resources.teardown_timeout(), Duration::from_millis(1000));
        assert_eq!(s.pixel_format, PixelFormatPolicy::Strict);
        assert_eq!(s.x_display_name, None);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "input:\n  mouse_delay_ms: 0\npixel_format: lenient\npath:\n  max_steps: 50\n";
        let s = Settings::from_yaml(yaml).unwrap();
        assert_eq!(s.input.mouse_delay_ms, 0);
        assert_eq!(s.input.keyboard_delay_ms, 10);
        assert_eq!(s.pixel_format, PixelFormatPolicy::Lenient);
        assert_eq!(s.path.max_steps, 50);
        assert_eq!(s.path.step_pixels, 4.0);

        let s = Settings::from_yaml("x_display_name: \":1\"\n").unwrap();
        assert_eq!(s.x_display_name.as_deref(), Some(":1"));
        assert!(!Settings::default().to_yaml().unwrap().contains("x_display_name"));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.input.keyboard_delay_ms = 25;
        settings.resources.teardown_timeout_ms = 250;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "input: [not, a, map").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Yaml(_))));
        assert_eq!(Settings::load_from_or_default(&path), Settings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_path("missing");
        assert!(matches!(Settings::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(Settings::load_from_or_default(&path), Settings::default());
    }
}
