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
//! Windowed latency histogram.
//!
//! A fixed ring of HDR histograms. Samples go into the current window;
//! [`WindowedHistogram::rotate`] advances the ring and clears the window it
//! lands on, so the oldest data is retired. [`WindowedHistogram::merge`]
//! folds every retained window into one histogram for quantile queries.

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// Shape of every window in a [`WindowedHistogram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramOptions {
    /// Number of windows kept in the ring
    pub windows: usize,

    /// Smallest value distinguishable from zero (must be >= 1)
    pub lowest_discernible: u64,

    /// Largest value tracked; larger samples saturate to it
    pub highest_trackable: u64,

    /// Value precision in significant decimal digits (0..=5)
    pub significant_figures: u8,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            windows: 5,
            lowest_discernible: 1,
            // five minutes, in milliseconds
            highest_trackable: 5 * 60 * 1000,
            significant_figures: 1,
        }
    }
}

impl HistogramOptions {
    /// Check the options describe a histogram that can be built
    pub fn validate(&self) -> MetricsResult<()> {
        if self.windows == 0 {
            return Err(MetricsError::InvalidHistogram(
                "at least one window is required".to_string(),
            ));
        }
        self.new_histogram().map(|_| ())
    }

    fn new_histogram(&self) -> MetricsResult<Histogram<u64>> {
        Histogram::new_with_bounds(
            self.lowest_discernible,
            self.highest_trackable,
            self.significant_figures,
        )
        .map_err(|e| {
            MetricsError::InvalidHistogram(format!(
                "bounds [{}, {}] with {} significant figures: {:?}",
                self.lowest_discernible, self.highest_trackable, self.significant_figures, e
            ))
        })
    }
}

/// Ring of histograms with time-based retirement
///
/// Not synchronised; the backend wraps each one in its own lock.
#[derive(Debug, Clone)]
pub struct WindowedHistogram {
    windows: Vec<Histogram<u64>>,
    current: usize,
    options: HistogramOptions,
}

impl WindowedHistogram {
    /// Build an empty ring
    pub fn new(options: HistogramOptions) -> MetricsResult<Self> {
        options.validate()?;
        let windows = (0..options.windows)
            .map(|_| options.new_histogram())
            .collect::<MetricsResult<Vec<_>>>()?;

        Ok(Self {
            windows,
            current: 0,
            options,
        })
    }

    /// Options this ring was built with
    pub fn options(&self) -> &HistogramOptions {
        &self.options
    }

    /// Record a sample into the current window
    ///
    /// Negative values are recorded as zero and values above
    /// `highest_trackable` saturate to it.
    pub fn record(&mut self, value: i64) {
        let value = u64::try_from(value).unwrap_or(0);
        let value = value.min(self.options.highest_trackable);
        self.windows[self.current].saturating_record(value);
    }

    /// Retire the oldest window and make it the (empty) current one
    pub fn rotate(&mut self) {
        self.current = (self.current + 1) % self.windows.len();
        self.windows[self.current].reset();
    }

    /// Number of samples currently retained across all windows
    pub fn len(&self) -> u64 {
        self.windows.iter().map(|w| w.len()).sum()
    }

    /// Whether no window holds a sample
    pub fn is_empty(&self) -> bool {
        self.windows.iter().all(|w| w.is_empty())
    }

    /// Combine every retained window into a single histogram
    pub fn merge(&self) -> MetricsResult<Histogram<u64>> {
        let mut merged = self.options.new_histogram()?;
        for window in &self.windows {
            merged
                .add(window)
                .map_err(|e| MetricsError::HistogramMerge(format!("{:?}", e)))?;
        }
        Ok(merged)
    }
}

/// Value at `percentile` (0..=100) of `histogram`, as a signed integer
///
/// An empty histogram yields zero.
pub fn value_at_percentile(histogram: &Histogram<u64>, percentile: f64) -> i64 {
    if histogram.is_empty() {
        return 0;
    }
    let value = histogram.value_at_quantile(percentile / 100.0);
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(windows: usize) -> HistogramOptions {
        HistogramOptions {
            windows,
            ..HistogramOptions::default()
        }
    }

    #[test]
    fn test_rejects_zero_windows() {
        assert!(WindowedHistogram::new(options(0)).is_err());
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let bad = HistogramOptions {
            lowest_discernible: 0,
            ..HistogramOptions::default()
        };
        assert!(matches!(
            WindowedHistogram::new(bad),
            Err(MetricsError::InvalidHistogram(_))
        ));

        let bad_precision = HistogramOptions {
            significant_figures: 6,
            ..HistogramOptions::default()
        };
        assert!(bad_precision.validate().is_err());
    }

    #[test]
    fn test_empty_merge_yields_zero() {
        let hist = WindowedHistogram::new(options(5)).unwrap();
        let merged = hist.merge().unwrap();
        assert_eq!(value_at_percentile(&merged, 50.0), 0);
        assert_eq!(value_at_percentile(&merged, 99.9), 0);
    }

    #[test]
    fn test_merge_spans_windows() {
        let mut hist = WindowedHistogram::new(options(3)).unwrap();
        hist.record(10);
        hist.rotate();
        hist.record(20);
        hist.rotate();
        hist.record(30);

        assert_eq!(hist.len(), 3);
        assert_eq!(hist.merge().unwrap().len(), 3);
    }

    #[test]
    fn test_rotation_retires_oldest_window() {
        let mut hist = WindowedHistogram::new(options(2)).unwrap();
        hist.record(10);
        hist.rotate();
        hist.record(20);
        assert_eq!(hist.len(), 2);

        // the window holding 10 becomes current again and is cleared
        hist.rotate();
        assert_eq!(hist.len(), 1);
        let merged = hist.merge().unwrap();
        assert_eq!(value_at_percentile(&merged, 50.0), 20);

        hist.rotate();
        assert!(hist.is_empty());
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        let mut hist = WindowedHistogram::new(options(1)).unwrap();
        hist.record(-5);
        hist.record(i64::MAX);

        let merged = hist.merge().unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(value_at_percentile(&merged, 0.0), 0);
        assert!(merged.max() >= hist.options().highest_trackable);
    }

    #[test]
    fn test_quantiles_follow_bucket_precision() {
        // one significant figure: 32 sub-buckets per power of two
        let mut hist = WindowedHistogram::new(options(5)).unwrap();
        for ms in [35_000, 6_000, 576, 12_000] {
            hist.record(ms);
        }
        let merged = hist.merge().unwrap();

        assert_eq!(value_at_percentile(&merged, 50.0), 6143);
        assert_eq!(value_at_percentile(&merged, 75.0), 12287);
        assert_eq!(value_at_percentile(&merged, 90.0), 36863);
        assert_eq!(value_at_percentile(&merged, 99.9), 36863);
    }
}
