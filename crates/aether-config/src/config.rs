//! Configuration structs with defaults and RON persistence.

use std::path::Path;
use std::time::Duration;

use aether_terminator::{FeatureOptions, RefreshSchedule, TerminatorOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terminator sampling and refresh.
    pub terminator: TerminatorConfig,
    /// Styling handed to the map layer that draws the overlay.
    pub style: OverlayStyle,
    /// How results are printed.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terminator computation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerminatorConfig {
    /// Samples per degree of longitude.
    pub resolution: u32,
    /// Seconds between recomputations in watch mode.
    pub refresh_interval_secs: u64,
}

/// Overlay polygon styling. The terminator itself never renders; these are
/// passed through to whatever draws it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    /// Stroke color as a CSS hex string.
    pub color: String,
    /// Stroke opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Fill color as a CSS hex string.
    pub fill_color: String,
    /// Fill opacity (0.0 - 1.0).
    pub fill_opacity: f32,
}

/// Output shape for the command-line host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// GeoJSON `Feature` with `[lng, lat]` coordinates.
    #[default]
    #[value(name = "geojson")]
    GeoJson,
    /// JSON array of `[lat, lng]` pairs for polygon overlay primitives.
    LatLngs,
    /// Human-readable summary.
    Summary,
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Fill GeoJSON `properties` with instant, declination and resolution.
    pub include_metadata: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for TerminatorConfig {
    fn default() -> Self {
        Self {
            resolution: aether_terminator::DEFAULT_RESOLUTION,
            refresh_interval_secs: aether_terminator::DEFAULT_REFRESH_INTERVAL.as_secs(),
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            opacity: 0.5,
            fill_color: "#000000".to_string(),
            fill_opacity: 0.5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TerminatorConfig {
    pub fn options(&self) -> TerminatorOptions {
        TerminatorOptions::with_resolution(self.resolution)
    }

    pub fn schedule(&self) -> RefreshSchedule {
        RefreshSchedule {
            interval: Duration::from_secs(self.refresh_interval_secs),
        }
    }
}

impl OutputConfig {
    pub fn feature_options(&self) -> FeatureOptions {
        FeatureOptions {
            include_metadata: self.include_metadata,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: config_path.to_path_buf(),
            source,
        })
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the terminator or the overlay cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terminator.resolution == 0 {
            return Err(ConfigError::Invalid(
                "terminator.resolution must be at least 1".to_string(),
            ));
        }
        if self.terminator.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "terminator.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("style.opacity", self.style.opacity),
            ("style.fill_opacity", self.style.fill_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0.0..=1.0, got {value}"
                )));
            }
        }
        Ok(())
    }
}
