use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::units::{TemperatureUnit, WindSpeedUnit};

pub const DEFAULT_ENDPOINT: &str = "http://query.yahooapis.com/v1/public/yql";

/// Where the applet sits in the panel. Only the display side acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    #[default]
    Center,
    Right,
    Left,
}

/// HTTP settings for the weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

/// User settings, read once at the start of every refresh cycle.
///
/// Example TOML:
/// ```toml
/// location-id = "615702"
/// temperature-unit = "celsius"
/// wind-speed-unit = "mps"
///
/// [http]
/// timeout-secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Configuration {
    pub temperature_unit: TemperatureUnit,
    pub wind_speed_unit: WindSpeedUnit,
    pub location_id: String,
    /// Shown instead of the city reported by the API when non-empty.
    pub city_name_override: String,
    pub translate_condition: bool,
    pub show_sunrise_sunset: bool,
    pub use_symbolic_icons: bool,
    pub show_text_in_panel: bool,
    pub show_comment_in_panel: bool,
    pub position_in_panel: PanelPosition,
    pub refresh_interval_secs: u64,
    pub http: HttpConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::default(),
            wind_speed_unit: WindSpeedUnit::default(),
            location_id: String::new(),
            city_name_override: String::new(),
            translate_condition: true,
            show_sunrise_sunset: false,
            use_symbolic_icons: false,
            show_text_in_panel: true,
            show_comment_in_panel: false,
            position_in_panel: PanelPosition::default(),
            refresh_interval_secs: 600,
            http: HttpConfig::default(),
        }
    }
}

impl Configuration {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// The override, if one is set.
    pub fn city_name_override(&self) -> Option<&str> {
        let name = self.city_name_override.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs < 1 {
            bail!("refresh-interval-secs must be at least 1, got {}", self.refresh_interval_secs);
        }
        if self.http.timeout_secs < 1 {
            bail!("http.timeout-secs must be at least 1, got {}", self.http.timeout_secs);
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Configuration =
            toml::from_str(contents).context("Failed to parse configuration TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from `path`, or return the defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "gnome-shell-extensions", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
