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
//! Metric factories
//!
//! A [`Factory`] hands out bound counter, gauge and timer handles and can
//! derive namespaced child factories.

use std::sync::Arc;
use std::time::Duration;

use crate::key::{join_namespace, merge_tags, Tags};
use crate::local::LocalBackend;
use crate::metrics::{Counter, Gauge, NullCounter, NullGauge, NullTimer, Timer};

/// Creates metric handles bound to a name and tag set
pub trait Factory: Send + Sync {
    /// Counter bound to `name` and `tags`
    fn counter(&self, name: &str, tags: &Tags) -> Arc<dyn Counter>;

    /// Gauge bound to `name` and `tags`
    fn gauge(&self, name: &str, tags: &Tags) -> Arc<dyn Gauge>;

    /// Timer bound to `name` and `tags`
    fn timer(&self, name: &str, tags: &Tags) -> Arc<dyn Timer>;

    /// Child factory that prefixes names with `name` and adds `tags` to every metric
    fn namespace(&self, name: &str, tags: &Tags) -> Arc<dyn Factory>;
}

/// Factory whose metrics discard everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFactory;

impl Factory for NullFactory {
    fn counter(&self, _name: &str, _tags: &Tags) -> Arc<dyn Counter> {
        Arc::new(NullCounter)
    }

    fn gauge(&self, _name: &str, _tags: &Tags) -> Arc<dyn Gauge> {
        Arc::new(NullGauge)
    }

    fn timer(&self, _name: &str, _tags: &Tags) -> Arc<dyn Timer> {
        Arc::new(NullTimer)
    }

    fn namespace(&self, _name: &str, _tags: &Tags) -> Arc<dyn Factory> {
        Arc::new(NullFactory)
    }
}

/// Factory backed by a shared [`LocalBackend`]
#[derive(Clone)]
pub struct LocalFactory {
    backend: Arc<LocalBackend>,
    namespace: String,
    tags: Tags,
}

impl LocalFactory {
    /// Root factory over `backend`
    pub fn new(backend: Arc<LocalBackend>) -> Self {
        Self {
            backend,
            namespace: String::new(),
            tags: Tags::new(),
        }
    }

    /// Backend that receives every metric created here
    pub fn backend(&self) -> &Arc<LocalBackend> {
        &self.backend
    }

    fn bind(&self, name: &str, tags: &Tags) -> Binding {
        Binding {
            backend: Arc::clone(&self.backend),
            name: join_namespace(&self.namespace, name),
            tags: merge_tags(&self.tags, tags),
        }
    }
}

impl Factory for LocalFactory {
    fn counter(&self, name: &str, tags: &Tags) -> Arc<dyn Counter> {
        Arc::new(LocalCounter(self.bind(name, tags)))
    }

    fn gauge(&self, name: &str, tags: &Tags) -> Arc<dyn Gauge> {
        Arc::new(LocalGauge(self.bind(name, tags)))
    }

    fn timer(&self, name: &str, tags: &Tags) -> Arc<dyn Timer> {
        Arc::new(LocalTimer(self.bind(name, tags)))
    }

    fn namespace(&self, name: &str, tags: &Tags) -> Arc<dyn Factory> {
        Arc::new(LocalFactory {
            backend: Arc::clone(&self.backend),
            namespace: join_namespace(&self.namespace, name),
            tags: merge_tags(&self.tags, tags),
        })
    }
}

struct Binding {
    backend: Arc<LocalBackend>,
    name: String,
    tags: Tags,
}

struct LocalCounter(Binding);

impl Counter for LocalCounter {
    fn inc(&self, delta: i64) {
        self.0.backend.increment_counter(&self.0.name, &self.0.tags, delta);
    }
}

struct LocalGauge(Binding);

impl Gauge for LocalGauge {
    fn update(&self, value: i64) {
        self.0.backend.update_gauge(&self.0.name, &self.0.tags, value);
    }
}

struct LocalTimer(Binding);

impl Timer for LocalTimer {
    fn record(&self, duration: Duration) {
        self.0.backend.record_timer(&self.0.name, &self.0.tags, duration);
    }
}
