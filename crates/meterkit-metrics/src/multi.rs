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
//! Factory that fans every metric out to several factories

use std::sync::Arc;
use std::time::Duration;

use crate::factory::Factory;
use crate::key::Tags;
use crate::metrics::{Counter, Gauge, Timer};

/// Reports every metric to all wrapped factories
#[derive(Clone, Default)]
pub struct MultiFactory {
    factories: Vec<Arc<dyn Factory>>,
}

impl MultiFactory {
    /// Wrap `factories`
    pub fn new(factories: Vec<Arc<dyn Factory>>) -> Self {
        Self { factories }
    }
}

impl Factory for MultiFactory {
    fn counter(&self, name: &str, tags: &Tags) -> Arc<dyn Counter> {
        Arc::new(MultiCounter(
            self.factories.iter().map(|f| f.counter(name, tags)).collect(),
        ))
    }

    fn gauge(&self, name: &str, tags: &Tags) -> Arc<dyn Gauge> {
        Arc::new(MultiGauge(
            self.factories.iter().map(|f| f.gauge(name, tags)).collect(),
        ))
    }

    fn timer(&self, name: &str, tags: &Tags) -> Arc<dyn Timer> {
        Arc::new(MultiTimer(
            self.factories.iter().map(|f| f.timer(name, tags)).collect(),
        ))
    }

    fn namespace(&self, name: &str, tags: &Tags) -> Arc<dyn Factory> {
        Arc::new(MultiFactory {
            factories: self
                .factories
                .iter()
                .map(|f| f.namespace(name, tags))
                .collect(),
        })
    }
}

struct MultiCounter(Vec<Arc<dyn Counter>>);

impl Counter for MultiCounter {
    fn inc(&self, delta: i64) {
        for counter in &self.0 {
            counter.inc(delta);
        }
    }
}

struct MultiGauge(Vec<Arc<dyn Gauge>>);

impl Gauge for MultiGauge {
    fn update(&self, value: i64) {
        for gauge in &self.0 {
            gauge.update(value);
        }
    }
}

struct MultiTimer(Vec<Arc<dyn Timer>>);

impl Timer for MultiTimer {
    fn record(&self, duration: Duration) {
        for timer in &self.0 {
            timer.record(duration);
        }
    }
}
