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
//! Factory that routes one namespace to a separate factory

use std::sync::Arc;

use crate::factory::Factory;
use crate::key::Tags;
use crate::metrics::{Counter, Gauge, Timer};

/// Sends metrics under `fork_namespace` to one factory and everything else to another
///
/// Metrics created directly on the fork go to the default factory. Asking
/// for the fork namespace returns the fork factory's namespace; any other
/// namespace yields a nested fork over both factories' children.
#[derive(Clone)]
pub struct ForkFactory {
    fork_namespace: String,
    fork_factory: Arc<dyn Factory>,
    default_factory: Arc<dyn Factory>,
}

impl ForkFactory {
    /// Create a fork on `fork_namespace`
    pub fn new(
        fork_namespace: impl Into<String>,
        fork_factory: Arc<dyn Factory>,
        default_factory: Arc<dyn Factory>,
    ) -> Self {
        Self {
            fork_namespace: fork_namespace.into(),
            fork_factory,
            default_factory,
        }
    }
}

impl Factory for ForkFactory {
    fn counter(&self, name: &str, tags: &Tags) -> Arc<dyn Counter> {
        self.default_factory.counter(name, tags)
    }

    fn gauge(&self, name: &str, tags: &Tags) -> Arc<dyn Gauge> {
        self.default_factory.gauge(name, tags)
    }

    fn timer(&self, name: &str, tags: &Tags) -> Arc<dyn Timer> {
        self.default_factory.timer(name, tags)
    }

    fn namespace(&self, name: &str, tags: &Tags) -> Arc<dyn Factory> {
        if name == self.fork_namespace {
            return self.fork_factory.namespace(name, tags);
        }

        Arc::new(ForkFactory {
            fork_namespace: self.fork_namespace.clone(),
            fork_factory: self.fork_factory.namespace(name, tags),
            default_factory: self.default_factory.namespace(name, tags),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::LocalFactory;
    use crate::local::LocalBackend;
    use std::time::Duration;

    fn backend() -> Arc<LocalBackend> {
        Arc::new(LocalBackend::new(Duration::from_secs(60)).unwrap())
    }

    #[test]
    fn test_fork_routes_matching_namespace() {
        let fork_backend = backend();
        let default_backend = backend();
        let fork = ForkFactory::new(
            "internal",
            Arc::new(LocalFactory::new(Arc::clone(&fork_backend))),
            Arc::new(LocalFactory::new(Arc::clone(&default_backend))),
        );

        fork.counter("top", &Tags::new()).inc(1);
        fork.namespace("internal", &Tags::new())
            .counter("hidden", &Tags::new())
            .inc(2);
        fork.namespace("public", &Tags::new())
            .gauge("shown", &Tags::new())
            .update(3);

        let forked = fork_backend.snapshot();
        let defaulted = default_backend.snapshot();

        assert_eq!(forked.counters.get("internal.hidden"), Some(&2));
        assert!(forked.counters.get("top").is_none());
        assert_eq!(defaulted.counters.get("top"), Some(&1));
        assert_eq!(defaulted.gauges.get("public.shown"), Some(&3));
        assert!(defaulted.counters.get("internal.hidden").is_none());
    }

    #[test]
    fn test_nested_fork_still_routes() {
        let fork_backend = backend();
        let default_backend = backend();
        let fork = ForkFactory::new(
            "internal",
            Arc::new(LocalFactory::new(Arc::clone(&fork_backend))),
            Arc::new(LocalFactory::new(Arc::clone(&default_backend))),
        );

        fork.namespace("outer", &Tags::new())
            .namespace("internal", &Tags::new())
            .counter("c", &Tags::new())
            .inc(5);

        assert_eq!(fork_backend.snapshot().counters.get("outer.internal.c"), Some(&5));
        assert!(default_backend.snapshot().counters.is_empty());
    }
}
