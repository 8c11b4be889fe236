//! User configuration.
//!
//! Stored as TOML at `<config dir>/tsr/config.toml` (override with
//! `TSR_CONFIG`). A missing file yields defaults, and missing fields in an
//! existing file fall back to their defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TSR_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
}

/// Playback defaults and speed control bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial speed multiplier (1.0 = recorded pace)
    pub speed: f64,
    /// Restart from the beginning after the last event
    pub looping: bool,
    /// Factor applied by speed up / speed down
    pub speed_step: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Jump size for relative seeks, in milliseconds
    pub seek_step_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            looping: false,
            speed_step: 1.5,
            min_speed: 0.1,
            max_speed: 16.0,
            seek_step_ms: 5_000,
        }
    }
}

impl PlaybackConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.min_speed.is_finite() || self.min_speed <= 0.0 {
            bail!("playback.min_speed must be positive (got {})", self.min_speed);
        }
        if !self.max_speed.is_finite() || self.max_speed < self.min_speed {
            bail!(
                "playback.max_speed must be at least min_speed (got {} < {})",
                self.max_speed,
                self.min_speed
            );
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            bail!("playback.speed must be positive (got {})", self.speed);
        }
        if !self.speed_step.is_finite() || self.speed_step <= 1.0 {
            bail!(
                "playback.speed_step must be greater than 1 (got {})",
                self.speed_step
            );
        }
        Ok(())
    }

    /// Clamp a speed into `[min_speed, max_speed]`.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(self.min_speed, self.max_speed)
    }
}

impl Config {
    /// Location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("tsr").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config =
            Self::from_toml_str(&content).with_context(|| format!("Invalid config: {:?}", path))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
        config.playback.validate()?;
        Ok(config)
    }

    /// Write to the default location, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).with_context(|| format!("Failed to write config: {:?}", path))?;
        Ok(())
    }
}
