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
//! Meterkit Metrics
//!
//! Backend-agnostic counters, gauges and timers, plus an in-process
//! aggregation backend that can be snapshotted at any time.
//!
//! # Features
//!
//! - **Capability traits**: [`Counter`], [`Gauge`], [`Timer`] and [`Factory`]
//! - **Local backend**: lock-light aggregation with windowed latency percentiles
//! - **Composition**: namespaces, [`ForkFactory`], [`MultiFactory`], [`NullFactory`]
//! - **Registration**: [`MetricsBuilder`] wires a group of metrics in one step
//!
//! # Example
//!
//! ```
//! use meterkit_metrics::{Factory, LocalBackend, LocalFactory, Tags};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), meterkit_metrics::MetricsError> {
//! let backend = Arc::new(LocalBackend::new(Duration::from_secs(60))?);
//! let factory = LocalFactory::new(Arc::clone(&backend));
//!
//! factory.counter("requests", &Tags::new()).inc(1);
//! factory.timer("latency", &Tags::new()).record(Duration::from_millis(12));
//!
//! let snapshot = backend.snapshot();
//! assert_eq!(snapshot.counters["requests"], 1);
//! backend.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod factory;
pub mod fork;
pub mod key;
pub mod local;
pub mod metrics;
pub mod multi;
pub mod stopwatch;
pub mod window;

pub use builder::{MetricKind, MetricsBuilder, RegisteredMetrics};
pub use config::{BackendConfig, ConfigFormat};
pub use error::{MetricsError, MetricsResult};
pub use factory::{Factory, LocalFactory, NullFactory};
pub use fork::ForkFactory;
pub use key::{canonical_key, KeyFormat, MetricKey, Tags};
pub use local::{LocalBackend, Snapshot, PERCENTILES};
pub use metrics::{Counter, Gauge, NullCounter, NullGauge, NullTimer, Timer};
pub use multi::MultiFactory;
pub use stopwatch::Stopwatch;
pub use window::{HistogramOptions, WindowedHistogram};
