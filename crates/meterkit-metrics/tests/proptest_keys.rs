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
#![allow(clippy::unwrap_used)]
//! Property-Based Tests for keys and aggregation
//!
//! - Canonical keys do not depend on tag insertion order
//! - Counter totals equal the sum of all deltas
//! - Gauges keep the last serialised update

use meterkit_metrics::{canonical_key, KeyFormat, LocalBackend, MetricKey, Tags};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

fn arb_tags() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..6)
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z._-]{0,12}"
}

#[test]
fn proptest_key_independent_of_tag_order() {
    proptest!(|(name in arb_name(), first in arb_tags(), second in arb_tags())| {
        // keep the two sets disjoint
        let second: BTreeMap<_, _> = second
            .into_iter()
            .filter(|(k, _)| !first.contains_key(k))
            .collect();

        let mut forward = Tags::new();
        forward.extend(first.clone());
        forward.extend(second.clone());

        let mut backward = Tags::new();
        backward.extend(second.into_iter().rev());
        backward.extend(first.into_iter().rev());

        prop_assert_eq!(canonical_key(&name, &forward), canonical_key(&name, &backward));
        prop_assert_eq!(MetricKey::new(name.clone(), &forward), MetricKey::new(name, &backward));
    });
}

#[test]
fn proptest_key_matches_metric_key_rendering() {
    proptest!(|(name in arb_name(), tags in arb_tags())| {
        let tags: Tags = tags.into_iter().collect();
        let format = KeyFormat::new("#", ":");
        prop_assert_eq!(format.render(&name, &tags), MetricKey::new(name.clone(), &tags).canonical(&format));
    });
}

#[test]
fn proptest_counter_sum() {
    let backend = LocalBackend::new(Duration::from_secs(60)).unwrap();
    proptest!(|(deltas in prop::collection::vec(-1_000i64..1_000, 1..64), id in 0u32..1_000_000)| {
        let name = format!("counter-{}", id);
        let before = backend.snapshot().counters.get(&name).copied().unwrap_or(0);
        for delta in &deltas {
            backend.increment_counter(&name, &Tags::new(), *delta);
        }
        let total: i64 = deltas.iter().sum();
        prop_assert_eq!(backend.snapshot().counters[&name], before + total);
    });
    backend.stop().unwrap();
}

#[test]
fn proptest_gauge_last_write_wins() {
    let backend = LocalBackend::new(Duration::from_secs(60)).unwrap();
    proptest!(|(values in prop::collection::vec(any::<i64>(), 1..32))| {
        for value in &values {
            backend.update_gauge("gauge", &Tags::new(), *value);
        }
        prop_assert_eq!(backend.snapshot().gauges["gauge"], *values.last().unwrap());
    });
    backend.stop().unwrap();
}
