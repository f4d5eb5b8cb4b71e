#![forbid(unsafe_code)]

//! Notification defaults loaded from TOML.
//!
//! ```toml
//! # perch.toml
//! corner = "top-right"
//! margin_x = 16.0
//! margin_y = 24.0
//! duration_ms = 750
//! ```
//!
//! ```rust,ignore
//! let config = PerchConfig::from_toml_file("perch.toml")?;
//! let toast = Notification::from_config(window, &config, &screen, ledger)?;
//! ```
//!
//! Missing keys take the [`Default`] values, which match the builder's
//! defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::corner::Corner;
use crate::geometry::Margins;
use crate::notification::{DEFAULT_DURATION, DEFAULT_MARGIN};

/// Corner, margins and pass duration for new notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerchConfig {
    /// Corner to stack in.
    pub corner: Corner,
    /// Horizontal margin in pixels.
    pub margin_x: f64,
    /// Vertical margin in pixels.
    pub margin_y: f64,
    /// Length of each animation pass in milliseconds.
    pub duration_ms: u64,
}

impl Default for PerchConfig {
    fn default() -> Self {
        Self {
            corner: Corner::default(),
            margin_x: DEFAULT_MARGIN,
            margin_y: DEFAULT_MARGIN,
            duration_ms: DEFAULT_DURATION.as_millis() as u64,
        }
    }
}

impl PerchConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse and reject values a notification cannot be built with.
    pub fn from_toml_str_validated(s: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.margin_x.is_finite() {
            errors.push(format!("margin_x must be finite, got {}", self.margin_x));
        }
        if !self.margin_y.is_finite() {
            errors.push(format!("margin_y must be finite, got {}", self.margin_y));
        }
        if self.duration_ms == 0 {
            errors.push("duration_ms must be > 0".into());
        }

        errors
    }

    /// Margins as a geometry value.
    #[inline]
    #[must_use]
    pub fn margins(&self) -> Margins {
        Margins::new(self.margin_x, self.margin_y)
    }

    /// Pass duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Failure to load a [`PerchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
