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
//! Subscriber installation.
//!
//! Builds an `EnvFilter` plus one `fmt` layer from a [`LogConfig`] and
//! installs them as the process-wide default subscriber.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialize tracing with a format and optional level, other settings default
///
/// # Example
///
/// ```ignore
/// use meterkit_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, Some("debug"))?;
/// tracing::info!("Application started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    config.level = level.map(str::to_string);
    init_tracing_with_config(config)
}

/// Initialize tracing from a full configuration
///
/// Fails with [`LogError::AlreadyInitialized`] when a global subscriber is
/// already set, which lets tests and embedding applications call this
/// unconditionally.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;

    Registry::default()
        .with(build_fmt_layer(&config))
        .with(env_filter)
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}

fn build_fmt_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = fmt::layer()
        .with_writer(make_writer(config.output))
        .with_target(config.include_targets)
        .with_thread_ids(config.include_thread_ids);

    match (config.format, config.use_timestamps) {
        (LogFormat::Pretty, true) => base
            .pretty()
            .with_thread_names(true)
            .with_span_events(FmtSpan::ACTIVE)
            .with_ansi(config.use_color)
            .boxed(),
        (LogFormat::Pretty, false) => base
            .pretty()
            .without_time()
            .with_thread_names(true)
            .with_span_events(FmtSpan::ACTIVE)
            .with_ansi(config.use_color)
            .boxed(),
        (LogFormat::Compact, true) => base
            .compact()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(config.use_color)
            .boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .without_time()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(config.use_color)
            .boxed(),
        (LogFormat::Json, true) => base
            .json()
            .with_thread_names(true)
            .with_span_events(FmtSpan::FULL)
            .with_ansi(false)
            .boxed(),
        (LogFormat::Json, false) => base
            .json()
            .without_time()
            .with_thread_names(true)
            .with_span_events(FmtSpan::FULL)
            .with_ansi(false)
            .boxed(),
    }
}

fn make_writer(output: LogOutput) -> BoxMakeWriter {
    match output {
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
    }
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let filter = config.effective_level();
    EnvFilter::try_new(&filter).map_err(|e| LogError::InvalidFilter {
        reason: e.to_string(),
        filter,
    })
}
