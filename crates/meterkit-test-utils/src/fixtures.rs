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
//! Test fixtures.

use meterkit_metrics::{Factory, LocalBackend, LocalFactory, Tags};
use std::sync::Arc;
use std::time::Duration;

/// Build a tag set from literal pairs
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A local backend and a root factory over it
///
/// The backend rotates once a minute, so timer windows stay put for the
/// length of a test. It is stopped on drop.
pub struct TestBackend {
    /// Shared backend, for snapshots and assertions
    pub backend: Arc<LocalBackend>,
    /// Root factory with no namespace or tags
    pub factory: Arc<dyn Factory>,
}

impl TestBackend {
    /// Create a fresh backend
    ///
    /// # Panics
    ///
    /// Panics if the rotation thread cannot be spawned.
    pub fn new() -> Self {
        let backend = Arc::new(
            LocalBackend::new(Duration::from_secs(60)).expect("failed to start local backend"),
        );
        let factory: Arc<dyn Factory> = Arc::new(LocalFactory::new(Arc::clone(&backend)));
        Self { backend, factory }
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        // a test may already have stopped it
        let _ = self.backend.stop();
    }
}
