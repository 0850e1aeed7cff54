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
//! # Meterkit Test Utilities
//!
//! Helpers for tests of code instrumented with Meterkit:
//! - Expected-metric assertions against a [`LocalBackend`] snapshot
//! - Fixtures for a backend plus factory pair and inline tag sets
//!
//! [`LocalBackend`]: meterkit_metrics::LocalBackend

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::{tags, TestBackend};
