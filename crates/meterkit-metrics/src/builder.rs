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
//! Declarative registration of a group of metrics
//!
//! Each entry names a field, a metric kind, a metric name and an optional
//! `k=v,k2=v2` tag string. [`MetricsBuilder::build`] validates every entry
//! and creates the handles through a [`Factory`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::error::{MetricsError, MetricsResult};
use crate::factory::Factory;
use crate::key::{merge_tags, parse_tags, Tags};
use crate::metrics::{Counter, Gauge, Timer};

/// Kind of metric a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// A [`Counter`]
    Counter,
    /// A [`Gauge`]
    Gauge,
    /// A [`Timer`]
    Timer,
}

impl MetricKind {
    /// Lower-case label
    pub fn as_label(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Timer => "timer",
        }
    }
}

#[derive(Debug, Clone)]
struct Registration {
    field: String,
    kind: MetricKind,
    metric: String,
    tags: String,
}

/// Collects metric registrations and builds them in one step
#[derive(Debug, Clone, Default)]
pub struct MetricsBuilder {
    global_tags: Tags,
    registrations: Vec<Registration>,
}

impl MetricsBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags applied to every metric; per-field tags win on conflict
    pub fn with_global_tags(mut self, tags: Tags) -> Self {
        self.global_tags = tags;
        self
    }

    /// Register `field` as a `kind` metric called `metric` with a `k=v,...` tag string
    pub fn register(
        mut self,
        field: impl Into<String>,
        kind: MetricKind,
        metric: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        self.registrations.push(Registration {
            field: field.into(),
            kind,
            metric: metric.into(),
            tags: tags.into(),
        });
        self
    }

    /// Register an untagged counter
    pub fn counter(self, field: impl Into<String>, metric: impl Into<String>) -> Self {
        self.register(field, MetricKind::Counter, metric, "")
    }

    /// Register an untagged gauge
    pub fn gauge(self, field: impl Into<String>, metric: impl Into<String>) -> Self {
        self.register(field, MetricKind::Gauge, metric, "")
    }

    /// Register an untagged timer
    pub fn timer(self, field: impl Into<String>, metric: impl Into<String>) -> Self {
        self.register(field, MetricKind::Timer, metric, "")
    }

    /// Validate every registration and create the handles through `factory`
    ///
    /// Nothing is created unless all registrations are valid.
    pub fn build(&self, factory: &dyn Factory) -> MetricsResult<RegisteredMetrics> {
        let mut resolved = Vec::with_capacity(self.registrations.len());
        let mut seen = HashSet::new();
        for reg in &self.registrations {
            if !seen.insert(reg.field.as_str()) {
                return Err(MetricsError::DuplicateField(reg.field.clone()));
            }
            if reg.metric.is_empty() {
                return Err(MetricsError::MissingMetricName {
                    field: reg.field.clone(),
                });
            }
            let tags = merge_tags(&self.global_tags, &parse_tags(&reg.field, &reg.tags)?);
            resolved.push((reg, tags));
        }

        let mut metrics = RegisteredMetrics::default();
        for (reg, tags) in resolved {
            let field = reg.field.clone();
            match reg.kind {
                MetricKind::Counter => {
                    metrics.counters.insert(field, factory.counter(&reg.metric, &tags));
                }
                MetricKind::Gauge => {
                    metrics.gauges.insert(field, factory.gauge(&reg.metric, &tags));
                }
                MetricKind::Timer => {
                    metrics.timers.insert(field, factory.timer(&reg.metric, &tags));
                }
            }
        }

        debug!(count = metrics.len(), "Registered metrics");
        Ok(metrics)
    }
}

/// Handles created by [`MetricsBuilder::build`], looked up by field name
#[derive(Default)]
pub struct RegisteredMetrics {
    counters: HashMap<String, Arc<dyn Counter>>,
    gauges: HashMap<String, Arc<dyn Gauge>>,
    timers: HashMap<String, Arc<dyn Timer>>,
}

impl RegisteredMetrics {
    /// Counter registered under `field`
    pub fn counter(&self, field: &str) -> MetricsResult<Arc<dyn Counter>> {
        lookup(&self.counters, field, MetricKind::Counter)
    }

    /// Gauge registered under `field`
    pub fn gauge(&self, field: &str) -> MetricsResult<Arc<dyn Gauge>> {
        lookup(&self.gauges, field, MetricKind::Gauge)
    }

    /// Timer registered under `field`
    pub fn timer(&self, field: &str) -> MetricsResult<Arc<dyn Timer>> {
        lookup(&self.timers, field, MetricKind::Timer)
    }

    /// Total number of registered metrics
    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len() + self.timers.len()
    }

    /// Whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lookup<T: ?Sized>(
    map: &HashMap<String, Arc<T>>,
    field: &str,
    kind: MetricKind,
) -> MetricsResult<Arc<T>> {
    map.get(field)
        .map(Arc::clone)
        .ok_or_else(|| MetricsError::UnknownField {
            field: field.to_string(),
            kind: kind.as_label(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{LocalFactory, NullFactory};
    use crate::local::LocalBackend;
    use std::time::Duration;

    #[test]
    fn test_build_and_use() {
        let backend = Arc::new(LocalBackend::new(Duration::from_secs(60)).unwrap());
        let factory = LocalFactory::new(Arc::clone(&backend));
        let global: Tags = [("key".to_string(), "value".to_string())].into_iter().collect();

        let metrics = MetricsBuilder::new()
            .with_global_tags(global)
            .register("gauge", MetricKind::Gauge, "gauge", "1=one,2=two")
            .counter("counter", "counter")
            .timer("timer", "timer")
            .build(&factory)
            .unwrap();
        assert_eq!(metrics.len(), 3);

        metrics.gauge("gauge").unwrap().update(10);
        metrics.counter("counter").unwrap().inc(5);
        metrics.timer("timer").unwrap().record(Duration::from_secs(35));

        let snapshot = backend.snapshot();
        assert_eq!(snapshot.counters["counter|key=value"], 5);
        assert_eq!(snapshot.gauges["gauge|1=one|2=two|key=value"], 10);
        assert_eq!(snapshot.gauges["timer|key=value.P50"], 36863);
    }

    #[test]
    fn test_field_tags_override_global() {
        let backend = Arc::new(LocalBackend::new(Duration::from_secs(60)).unwrap());
        let factory = LocalFactory::new(Arc::clone(&backend));
        let global: Tags = [("env".to_string(), "dev".to_string())].into_iter().collect();

        MetricsBuilder::new()
            .with_global_tags(global)
            .register("c", MetricKind::Counter, "c", "env=prod")
            .build(&factory)
            .unwrap()
            .counter("c")
            .unwrap()
            .inc(1);

        assert_eq!(backend.snapshot().counters["c|env=prod"], 1);
    }

    #[test]
    fn test_registration_failures() {
        let err = MetricsBuilder::new()
            .counter("NoMetricTag", "")
            .build(&NullFactory)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Field NoMetricTag is missing a metric name");

        let err = MetricsBuilder::new()
            .register("BadTags", MetricKind::Counter, "counter", "1=one,noValue")
            .build(&NullFactory)
            .err()
            .unwrap();
        assert!(matches!(err, MetricsError::InvalidTag { .. }));

        let err = MetricsBuilder::new()
            .counter("dup", "a")
            .gauge("dup", "b")
            .build(&NullFactory)
            .err()
            .unwrap();
        assert!(matches!(err, MetricsError::DuplicateField(f) if f == "dup"));
    }

    #[test]
    fn test_lookup_wrong_kind() {
        let metrics = MetricsBuilder::new()
            .counter("requests", "requests")
            .build(&NullFactory)
            .unwrap();
        assert!(metrics.counter("requests").is_ok());
        assert!(matches!(
            metrics.timer("requests"),
            Err(MetricsError::UnknownField { kind: "timer", .. })
        ));
    }
}
