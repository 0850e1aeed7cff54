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
//! Aggregate a burst of simulated requests and print a snapshot.
//!
//! Log lines about dropped requests are throttled with a rate limiter, so a
//! flood of failures produces a handful of warnings instead of thousands.
//!
//! Run with: cargo run -p meterkit-metrics --example snapshot_report

use meterkit_metrics::{
    BackendConfig, Factory, LocalBackend, LocalFactory, MetricKind, MetricsBuilder, Stopwatch,
    Tags,
};
use meterkit_observability::{init_tracing, LogFormat};
use meterkit_ratelimit::RateLimiter;
use std::sync::Arc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::Compact, Some("info,meterkit_metrics=debug"))?;

    let config = BackendConfig::with_rotation_interval(Duration::from_secs(5));
    let backend = Arc::new(LocalBackend::with_config(config)?);
    let root = LocalFactory::new(Arc::clone(&backend));
    let factory = root.namespace("frontend", &Tags::new());

    let metrics = MetricsBuilder::new()
        .with_global_tags([("region".to_string(), "eu".to_string())].into_iter().collect())
        .counter("requests", "requests")
        .register("dropped", MetricKind::Counter, "requests", "result=dropped")
        .timer("latency", "latency")
        .build(factory.as_ref())?;

    let log_limiter = RateLimiter::new(2.0, 3.0)?;
    let requests = metrics.counter("requests")?;
    let dropped = metrics.counter("dropped")?;
    let latency = metrics.timer("latency")?;

    for i in 0..500u64 {
        let stopwatch = Stopwatch::start(Arc::clone(&latency));
        requests.inc(1);
        if i % 7 == 0 {
            dropped.inc(1);
            if log_limiter.check_credit(1.0) {
                tracing::warn!(request = i, "Dropped request");
            }
        }
        std::thread::sleep(Duration::from_micros(i % 50));
        stopwatch.stop();
    }

    let snapshot = backend.snapshot();
    let mut report: Vec<_> = snapshot.counters.into_iter().chain(snapshot.gauges).collect();
    report.sort();
    for (key, value) in report {
        println!("{key:<40} {value}");
    }

    backend.stop()?;
    Ok(())
}
