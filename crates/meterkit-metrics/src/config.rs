// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Backend configuration
//!
//! Formatting constants and histogram shape are passed to the backend
//! explicitly instead of living in process-wide state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{MetricsError, MetricsResult};
use crate::key::KeyFormat;
use crate::local::DEFAULT_ROTATION_INTERVAL;
use crate::window::HistogramOptions;

/// Configuration for a [`LocalBackend`](crate::LocalBackend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// How often timer windows rotate, in milliseconds (0 = default of one minute)
    pub rotation_interval_ms: u64,

    /// Shape of every timer's windowed histogram
    pub histogram: HistogramOptions,

    /// Separators used to render canonical keys
    pub key_format: KeyFormat,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            rotation_interval_ms: DEFAULT_ROTATION_INTERVAL.as_millis() as u64,
            histogram: HistogramOptions::default(),
            key_format: KeyFormat::default(),
        }
    }
}

impl BackendConfig {
    /// Create a config with the given rotation interval
    pub fn with_rotation_interval(interval: Duration) -> Self {
        Self {
            rotation_interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            ..Default::default()
        }
    }

    /// Effective rotation interval
    pub fn rotation_interval(&self) -> Duration {
        if self.rotation_interval_ms == 0 {
            DEFAULT_ROTATION_INTERVAL
        } else {
            Duration::from_millis(self.rotation_interval_ms)
        }
    }

    /// Check every field describes something the backend can run with
    pub fn validate(&self) -> MetricsResult<()> {
        self.histogram.validate()?;
        if self.key_format.tags_separator.is_empty() {
            return Err(MetricsError::invalid_config(
                "key_format.tags_separator",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Parse and validate a config from a string
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> MetricsResult<Self> {
        let config: BackendConfig = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate()?;
        debug!("Backend configuration loaded from {}", format.name());
        Ok(config)
    }

    /// Load and validate a config file, picking the format from its extension
    pub fn load_file<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&content, format)
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml` files
    Toml,
    /// `.json` files
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> MetricsResult<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(MetricsError::UnsupportedFormat(ext.to_string())),
            None => Err(MetricsError::UnsupportedFormat(
                path.as_ref().display().to_string(),
            )),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}
