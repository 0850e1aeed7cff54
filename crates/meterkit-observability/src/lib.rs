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
//! Meterkit Observability
//!
//! Structured logging setup shared by the Meterkit crates and their
//! embedders. The library crates only emit `tracing` events; this crate
//! installs the subscriber that renders them.
//!
//! # Features
//!
//! - **Multiple Output Formats**: pretty, compact and JSON
//! - **Environment-based Filtering**: level directives via config or `RUST_LOG`
//! - **Config File Friendly**: [`LogConfig`] deserializes with serde
//!
//! # Example
//!
//! ```ignore
//! use meterkit_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Pretty, None)?;
//! tracing::info!("Application started");
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};
