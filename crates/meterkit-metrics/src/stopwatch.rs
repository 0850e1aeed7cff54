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
//! Measure a span of work and report it to a [`Timer`]

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::Timer;

/// Measures elapsed wall time from creation and records it on [`Stopwatch::stop`]
pub struct Stopwatch {
    timer: Arc<dyn Timer>,
    start: Instant,
}

impl Stopwatch {
    /// Start measuring now
    pub fn start(timer: Arc<dyn Timer>) -> Self {
        Self {
            timer,
            start: Instant::now(),
        }
    }

    /// Time since the stopwatch started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record the elapsed time on the timer and return it
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        self.timer.record(elapsed);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CapturingTimer(Mutex<Vec<Duration>>);

    impl Timer for CapturingTimer {
        fn record(&self, duration: Duration) {
            self.0.lock().push(duration);
        }
    }

    #[test]
    fn test_stop_records_elapsed() {
        let timer = Arc::new(CapturingTimer::default());
        let stopwatch = Stopwatch::start(Arc::clone(&timer) as Arc<dyn Timer>);
        std::thread::sleep(Duration::from_millis(2));

        let elapsed = stopwatch.stop();
        assert!(elapsed >= Duration::from_millis(2));
        assert_eq!(timer.0.lock().as_slice(), &[elapsed]);
    }
}
