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
//! Snapshot assertions.
//!
//! Each assertion takes one snapshot of the backend and compares it with a
//! list of [`ExpectedMetric`]s. Keys are rendered with the backend's own
//! key format, so expectations are written as plain name plus tags.

use meterkit_metrics::{LocalBackend, Tags};
use std::collections::HashMap;

/// A metric expected in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedMetric {
    /// Metric name, including any namespace prefix
    pub name: String,
    /// Tags as they were merged into the metric
    pub tags: Tags,
    /// Expected value
    pub value: i64,
}

impl ExpectedMetric {
    /// Expect `name` with no tags
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            value,
        }
    }

    /// Add a tag to the expectation
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Assert that each expected counter is present with its value
pub fn assert_counter_metric(backend: &LocalBackend, expected: &[ExpectedMetric]) {
    let counters = backend.snapshot().counters;
    assert_metrics(backend, "counter", &counters, expected);
}

/// Assert that each expected gauge is present with its value
///
/// Percentiles of an untagged timer can be expected as `<name>.P50` and
/// so on; tagged timers put the suffix after the tags.
pub fn assert_gauge_metric(backend: &LocalBackend, expected: &[ExpectedMetric]) {
    let gauges = backend.snapshot().gauges;
    assert_metrics(backend, "gauge", &gauges, expected);
}

/// Assert that the counters are exactly the expected set
pub fn assert_counter_metrics(backend: &LocalBackend, expected: &[ExpectedMetric]) {
    let counters = backend.snapshot().counters;
    assert_metrics(backend, "counter", &counters, expected);
    assert_same_len("counter", &counters, expected);
}

/// Assert that the gauges are exactly the expected set
pub fn assert_gauge_metrics(backend: &LocalBackend, expected: &[ExpectedMetric]) {
    let gauges = backend.snapshot().gauges;
    assert_metrics(backend, "gauge", &gauges, expected);
    assert_same_len("gauge", &gauges, expected);
}

fn assert_metrics(
    backend: &LocalBackend,
    kind: &str,
    actual: &HashMap<String, i64>,
    expected: &[ExpectedMetric],
) {
    let format = backend.key_format();
    for metric in expected {
        let key = format.render(&metric.name, &metric.tags);
        match actual.get(&key) {
            Some(value) => assert_eq!(
                *value, metric.value,
                "{} {} (tags {:?}) has value {}, expected {}",
                kind, metric.name, metric.tags, value, metric.value
            ),
            None => panic!(
                "{} {} (tags {:?}) not found under key {:?}; present: {:?}",
                kind,
                metric.name,
                metric.tags,
                key,
                sorted_keys(actual)
            ),
        }
    }
}

fn assert_same_len(kind: &str, actual: &HashMap<String, i64>, expected: &[ExpectedMetric]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {} {} metrics, snapshot has {}: {:?}",
        expected.len(),
        kind,
        actual.len(),
        sorted_keys(actual)
    );
}

fn sorted_keys(map: &HashMap<String, i64>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}
