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
//! Metric capabilities handed to application code.
//!
//! Handles are cheap to clone behind an `Arc` and safe to share across
//! threads. Backends decide what a call actually does.

use std::time::Duration;

/// Tracks the number of times something happened
pub trait Counter: Send + Sync {
    /// Add `delta` to the counter. `delta` may be negative.
    fn inc(&self, delta: i64);
}

/// Tracks the latest value of something
pub trait Gauge: Send + Sync {
    /// Overwrite the gauge with `value`
    fn update(&self, value: i64);
}

/// Tracks the distribution of durations
pub trait Timer: Send + Sync {
    /// Record a single duration
    fn record(&self, duration: Duration);
}

/// Counter that discards every increment
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCounter;

impl Counter for NullCounter {
    fn inc(&self, _delta: i64) {}
}

/// Gauge that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGauge;

impl Gauge for NullGauge {
    fn update(&self, _value: i64) {}
}

/// Timer that discards every sample
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTimer;

impl Timer for NullTimer {
    fn record(&self, _duration: Duration) {}
}
