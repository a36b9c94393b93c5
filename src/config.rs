//! Settings file
//!
//! Settings live in `config.toml` inside the platform config directory
//! (e.g. `~/.config/lissajous/config.toml`). Every field has a default, so a
//! missing file or a partial file is fine; a malformed file is an error.

use crate::colors::{self, Rgb};
use crate::curve::{self, CurveParameters};
use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::render::Viewport;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub curve: CurveSettings,
    pub engine: EngineSettings,
    pub timer: TimerSettings,
    pub canvas: CanvasSettings,
}

/// Initial oscillator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub x_frequency: f64,
    pub y_frequency: f64,
    /// Radians
    pub phase_offset: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        let params = CurveParameters::default();
        Self {
            x_frequency: params.x_frequency,
            y_frequency: params.y_frequency,
            phase_offset: params.phase_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub cycles: u32,
    pub points_per_cycle: usize,
    pub tail_length: usize,
    /// Time step between animated samples; one full period is `2π`
    pub step_size: f64,
    pub cold_color: Rgb,
    pub hot_color: Rgb,
    pub frozen_color: Rgb,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cycles: 10,
            points_per_cycle: 1000,
            tail_length: 1000,
            step_size: TAU / 1000.0,
            cold_color: colors::COLD,
            hot_color: colors::HOT,
            frozen_color: colors::FROZEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Tick period of the animated trace
    pub interval_ms: u64,
    /// Tick period of the slower single-trail profile
    pub simple_interval_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            interval_ms: 10,
            simple_interval_ms: 40,
        }
    }
}

impl TimerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn simple_interval(&self) -> Duration {
        Duration::from_millis(self.simple_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    /// Fraction of the half-extent covered by the unit square
    pub scale: f32,
    pub background: Rgb,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            scale: 0.75,
            background: colors::BLACK,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match config_path() {
                Some(path) => path,
                None => {
                    tracing::warn!("No config directory available, using default settings");
                    return Ok(Settings::default());
                }
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loaded settings");
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the engine or renderer cannot use meaningfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.parameters().is_finite() {
            return Err(ConfigError::invalid("curve", "frequencies and phase must be finite"));
        }
        if self.engine.points_per_cycle == 0 {
            return Err(ConfigError::invalid("engine.points_per_cycle", "must be at least 1"));
        }
        let cycles = self.engine.cycles as usize;
        if cycles
            .checked_mul(self.engine.points_per_cycle)
            .is_none_or(|n| n >= curve::MAX_SAMPLES)
        {
            return Err(ConfigError::invalid(
                "engine.points_per_cycle",
                format!("cycles * points_per_cycle must be below {}", curve::MAX_SAMPLES),
            ));
        }
        if !(1..=curve::MAX_SAMPLES).contains(&self.engine.tail_length) {
            return Err(ConfigError::invalid(
                "engine.tail_length",
                format!("must be between 1 and {}", curve::MAX_SAMPLES),
            ));
        }
        if self.engine.cold_color.luminance() >= self.engine.hot_color.luminance() {
            return Err(ConfigError::invalid(
                "engine.cold_color",
                format!(
                    "{} must be darker than hot_color {}",
                    self.engine.cold_color.to_hex(),
                    self.engine.hot_color.to_hex()
                ),
            ));
        }
        if !(self.engine.step_size.is_finite() && self.engine.step_size > 0.0) {
            return Err(ConfigError::invalid(
                "engine.step_size",
                format!("must be a positive number, got {}", self.engine.step_size),
            ));
        }
        if self.timer.interval_ms == 0 || self.timer.simple_interval_ms == 0 {
            return Err(ConfigError::invalid("timer", "intervals must be at least 1 ms"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::invalid("canvas", "width and height must be non-zero"));
        }
        if !(self.canvas.scale.is_finite() && self.canvas.scale > 0.0) {
            return Err(ConfigError::invalid("canvas.scale", "must be a positive number"));
        }
        Ok(())
    }

    pub fn parameters(&self) -> CurveParameters {
        CurveParameters::new(
            self.curve.x_frequency,
            self.curve.y_frequency,
            self.curve.phase_offset,
        )
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cycles: self.engine.cycles,
            points_per_cycle: self.engine.points_per_cycle,
            tail_length: self.engine.tail_length,
            step_size: self.engine.step_size,
            cold: self.engine.cold_color,
            hot: self.engine.hot_color,
            frozen_color: self.engine.frozen_color,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width, self.canvas.height, self.canvas.scale)
    }
}

/// Default location of the settings file
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lissajous").map(|dirs| dirs.config_dir().join("config.toml"))
}
