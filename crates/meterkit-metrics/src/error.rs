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
//! Error types for the metrics crate.
//!
//! Hot-path operations (increment, update, record) never fail. Errors only
//! surface from construction, configuration, registration and shutdown.

use thiserror::Error;

/// Errors that can occur while building or operating metrics components
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid histogram options: {0}")]
    InvalidHistogram(String),

    #[error("Failed to merge histogram windows: {0}")]
    HistogramMerge(String),

    #[error("Invalid configuration value for field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("Unsupported configuration format: {0}. Supported formats: toml, json")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local backend has already been stopped")]
    AlreadyStopped,

    #[error("Timer rotation thread panicked")]
    RotationPanicked,

    #[error("Field {field} is missing a metric name")]
    MissingMetricName { field: String },

    #[error("Field [{field}]: Tag [{pair}] is not of the form key=value in tags string [{spec}]")]
    InvalidTag {
        field: String,
        pair: String,
        spec: String,
    },

    #[error("Field {0} is registered more than once")]
    DuplicateField(String),

    #[error("No {kind} registered for field {field}")]
    UnknownField { field: String, kind: &'static str },
}

impl MetricsError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MetricsError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for MetricsError {
    fn from(err: toml::de::Error) -> Self {
        MetricsError::ConfigParse(err.to_string())
    }
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        MetricsError::ConfigParse(err.to_string())
    }
}

/// Result alias used throughout the metrics crate
pub type MetricsResult<T> = Result<T, MetricsError>;
