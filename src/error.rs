//! Error types for the outer surfaces
//!
//! The curve model and the animation engine never fail. Errors only arise
//! when reading settings from disk or producing images.

use std::path::PathBuf;
use thiserror::Error;

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Rasterisation and image output errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Canvas size {width}x{height} is not drawable")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    Encode(String),
    #[error("Render I/O error: {0}")]
    Io(#[from] std::io::Error),
}
