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
//! In-process aggregation backend
//!
//! Keeps counters, gauges and windowed timers keyed by canonical metric key
//! and exposes point-in-time snapshots. A background thread rotates every
//! timer's histogram on a fixed interval so percentiles describe recent
//! activity only.

use crossbeam_channel::{select, tick, Sender};
use hdrhistogram::Histogram;
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::error::{MetricsError, MetricsResult};
use crate::key::{KeyFormat, Tags};
use crate::window::{value_at_percentile, HistogramOptions, WindowedHistogram};

/// Rotation interval used when none (or zero) is configured
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(60);

/// Percentile gauges emitted for every timer, as `(suffix, percentile)`
pub const PERCENTILES: [(&str, f64); 6] = [
    ("P50", 50.0),
    ("P75", 75.0),
    ("P90", 90.0),
    ("P95", 95.0),
    ("P99", 99.0),
    ("P999", 99.9),
];

type TimerCell = Arc<Mutex<WindowedHistogram>>;

/// Point-in-time copy of a backend's values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Counter values by canonical key
    pub counters: HashMap<String, i64>,

    /// Gauge values by canonical key, plus `<timer-key>.<Pxx>` percentiles
    pub gauges: HashMap<String, i64>,
}

impl Snapshot {
    /// Split into `(counters, gauges)`
    pub fn into_parts(self) -> (HashMap<String, i64>, HashMap<String, i64>) {
        (self.counters, self.gauges)
    }
}

/// Concurrency-safe local metrics store
///
/// Each metric kind lives behind its own map lock. Lookups take the shared
/// lock; the exclusive lock is only taken the first time a key is seen.
/// Every timer also has its own lock, so recording into one timer never
/// waits on another.
///
/// The rotation thread is stopped by [`LocalBackend::stop`] or, failing
/// that, when the backend is dropped. Recording after `stop` still works,
/// but timer windows no longer rotate.
pub struct LocalBackend {
    state: Arc<BackendState>,
    rotation: Mutex<Option<RotationTask>>,
}

struct BackendState {
    key_format: KeyFormat,
    // empty ring cloned for every new timer
    template: WindowedHistogram,
    counters: RwLock<HashMap<String, AtomicI64>>,
    gauges: RwLock<HashMap<String, AtomicI64>>,
    timers: RwLock<HashMap<String, TimerCell>>,
}

struct RotationTask {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl LocalBackend {
    /// Create a backend with default settings and the given rotation interval
    ///
    /// A zero interval falls back to [`DEFAULT_ROTATION_INTERVAL`].
    pub fn new(rotation_interval: Duration) -> MetricsResult<Self> {
        Self::with_config(BackendConfig {
            rotation_interval_ms: u64::try_from(rotation_interval.as_millis()).unwrap_or(u64::MAX),
            ..BackendConfig::default()
        })
    }

    /// Create a backend from a full configuration
    pub fn with_config(config: BackendConfig) -> MetricsResult<Self> {
        config.validate()?;
        let interval = config.rotation_interval();

        let state = Arc::new(BackendState {
            key_format: config.key_format,
            template: WindowedHistogram::new(config.histogram)?,
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            timers: RwLock::new(HashMap::new()),
        });

        let rotation = RotationTask::spawn(Arc::clone(&state), interval)?;
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            windows = state.template.options().windows,
            "Local metrics backend started"
        );

        Ok(Self {
            state,
            rotation: Mutex::new(Some(rotation)),
        })
    }

    /// Separators used to build canonical keys
    pub fn key_format(&self) -> &KeyFormat {
        &self.state.key_format
    }

    /// Shape of every timer's histogram
    pub fn histogram_options(&self) -> &HistogramOptions {
        self.state.template.options()
    }

    /// Add `delta` to the counter identified by `name` and `tags`
    pub fn increment_counter(&self, name: &str, tags: &Tags, delta: i64) {
        let key = self.state.key_format.render(name, tags);
        if let Some(counter) = self.state.counters.read().get(&key) {
            counter.fetch_add(delta, Ordering::Relaxed);
            return;
        }

        let mut counters = self.state.counters.write();
        match counters.entry(key) {
            // another caller created it between our read and write lock
            Entry::Occupied(entry) => {
                entry.get().fetch_add(delta, Ordering::Relaxed);
            }
            Entry::Vacant(entry) => {
                entry.insert(AtomicI64::new(delta));
            }
        }
    }

    /// Overwrite the gauge identified by `name` and `tags`
    pub fn update_gauge(&self, name: &str, tags: &Tags, value: i64) {
        let key = self.state.key_format.render(name, tags);
        if let Some(gauge) = self.state.gauges.read().get(&key) {
            gauge.store(value, Ordering::Relaxed);
            return;
        }

        let mut gauges = self.state.gauges.write();
        match gauges.entry(key) {
            Entry::Occupied(entry) => entry.get().store(value, Ordering::Relaxed),
            Entry::Vacant(entry) => {
                entry.insert(AtomicI64::new(value));
            }
        }
    }

    /// Record `duration` (truncated to whole milliseconds) into a timer
    pub fn record_timer(&self, name: &str, tags: &Tags, duration: Duration) {
        let key = self.state.key_format.render(name, tags);
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        let timer = self.find_or_create_timer(key);
        timer.lock().record(millis);
    }

    fn find_or_create_timer(&self, key: String) -> TimerCell {
        if let Some(timer) = self.state.timers.read().get(&key) {
            return Arc::clone(timer);
        }

        let mut timers = self.state.timers.write();
        let timer = timers
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(self.state.template.clone())));
        Arc::clone(timer)
    }

    /// Copy out every counter and gauge, plus percentile gauges per timer
    ///
    /// Map locks are held only while copying; timers are merged one at a
    /// time under their own lock.
    pub fn snapshot(&self) -> Snapshot {
        let counters = load_all(&self.state.counters);
        let mut gauges = load_all(&self.state.gauges);

        for (key, timer) in self.state.timer_cells() {
            let merged = timer.lock().merge();
            match merged {
                Ok(hist) => insert_percentiles(&mut gauges, &key, &hist),
                Err(e) => warn!(timer = %key, error = %e, "Skipping timer in snapshot"),
            }
        }

        Snapshot { counters, gauges }
    }

    /// Rotate every timer's histogram once, immediately
    ///
    /// The background thread calls this on each tick.
    pub fn rotate_timers(&self) {
        self.state.rotate_timers();
    }

    /// Stop the rotation thread and wait for it to exit
    ///
    /// Returns [`MetricsError::AlreadyStopped`] if called more than once.
    pub fn stop(&self) -> MetricsResult<()> {
        let task = self
            .rotation
            .lock()
            .take()
            .ok_or(MetricsError::AlreadyStopped)?;
        task.stop()?;
        info!("Local metrics backend stopped");
        Ok(())
    }

    /// Whether the rotation thread is still running
    pub fn is_running(&self) -> bool {
        self.rotation.lock().is_some()
    }
}

impl Drop for LocalBackend {
    fn drop(&mut self) {
        if let Some(task) = self.rotation.get_mut().take() {
            if let Err(e) = task.stop() {
                warn!(error = %e, "Rotation thread did not shut down cleanly");
            }
        }
    }
}

impl BackendState {
    fn timer_cells(&self) -> Vec<(String, TimerCell)> {
        self.timers
            .read()
            .iter()
            .map(|(key, timer)| (key.clone(), Arc::clone(timer)))
            .collect()
    }

    fn rotate_timers(&self) {
        let timers = self.timer_cells();
        for (_, timer) in &timers {
            timer.lock().rotate();
        }
        debug!(timers = timers.len(), "Rotated timer windows");
    }
}

impl RotationTask {
    fn spawn(state: Arc<BackendState>, interval: Duration) -> MetricsResult<Self> {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("meterkit-rotation".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(ticker) -> _ => state.rotate_timers(),
                        // a message or a dropped sender both mean shut down
                        recv(stop_rx) -> _ => break,
                    }
                }
            })?;

        Ok(Self { stop_tx, handle })
    }

    fn stop(self) -> MetricsResult<()> {
        // the thread may already be gone; joining below is what matters
        let _ = self.stop_tx.send(());
        self.handle
            .join()
            .map_err(|_| MetricsError::RotationPanicked)
    }
}

fn load_all(map: &RwLock<HashMap<String, AtomicI64>>) -> HashMap<String, i64> {
    map.read()
        .iter()
        .map(|(key, value)| (key.clone(), value.load(Ordering::Relaxed)))
        .collect()
}

fn insert_percentiles(gauges: &mut HashMap<String, i64>, key: &str, hist: &Histogram<u64>) {
    for (suffix, percentile) in PERCENTILES {
        gauges.insert(
            format!("{}.{}", key, suffix),
            value_at_percentile(hist, percentile),
        );
    }
}
