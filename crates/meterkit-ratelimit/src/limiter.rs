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
//! Leaky-bucket credit limiter
//!
//! The limiter holds a credit balance that refills continuously at
//! `credits_per_second` up to `max_balance`. Nothing runs in the
//! background: the refill is computed from elapsed time whenever an
//! operation observes the balance.
//!
//! Limit messages per second by calling `check_credit(1.0)` per message, or
//! bytes per second by setting the rate in bytes and passing each message's
//! size as its cost.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{RateLimitError, RateLimitResult};

/// Thread-safe credit limiter
///
/// `0 <= balance <= max_balance` holds after every public operation.
pub struct RateLimiter {
    state: Mutex<Bucket>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug)]
struct Bucket {
    credits_per_second: f64,
    max_balance: f64,
    balance: f64,
    last_tick: Instant,
}

impl Bucket {
    /// Credit the time elapsed since the last tick
    fn refill(&mut self, now: Instant) {
        // a clock that went backwards yields zero elapsed time
        let elapsed = now.saturating_duration_since(self.last_tick);
        if now > self.last_tick {
            self.last_tick = now;
        }
        let balance = self.balance + elapsed.as_secs_f64() * self.credits_per_second;
        self.balance = balance.clamp(0.0, self.max_balance);
    }
}

impl RateLimiter {
    /// Create a limiter on the system clock, starting with a full balance
    pub fn new(credits_per_second: f64, max_balance: f64) -> RateLimitResult<Self> {
        Self::with_clock(credits_per_second, max_balance, Arc::new(SystemClock))
    }

    /// Create a limiter on a custom clock, starting with a full balance
    pub fn with_clock(
        credits_per_second: f64,
        max_balance: f64,
        clock: Arc<dyn Clock>,
    ) -> RateLimitResult<Self> {
        validate("credits_per_second", credits_per_second)?;
        validate("max_balance", max_balance)?;

        debug!(credits_per_second, max_balance, "Created rate limiter");
        let now = clock.now();
        Ok(Self {
            state: Mutex::new(Bucket {
                credits_per_second,
                max_balance,
                balance: max_balance,
                last_tick: now,
            }),
            clock,
        })
    }

    /// Spend `cost` credits if the balance covers it
    ///
    /// Returns `true` and debits the balance when `balance >= cost`;
    /// otherwise returns `false` and leaves the balance untouched. A NaN
    /// cost is never admitted.
    pub fn check_credit(&self, cost: f64) -> bool {
        let mut bucket = self.state.lock();
        bucket.refill(self.clock.now());
        if bucket.balance >= cost {
            bucket.balance = (bucket.balance - cost).clamp(0.0, bucket.max_balance);
            return true;
        }
        false
    }

    /// Return the current balance and reset it to zero
    pub fn drain(&self) -> f64 {
        let mut bucket = self.state.lock();
        bucket.refill(self.clock.now());
        std::mem::take(&mut bucket.balance)
    }

    /// Minimum wait before `check_credit(cost)` could succeed
    ///
    /// Assumes nobody else spends credits in the meantime. Zero when the
    /// balance already covers `cost`; [`Duration::MAX`] when the limiter
    /// never refills. Costs above `max_balance` can never be admitted, the
    /// returned wait is still the time to accrue them.
    pub fn determine_wait_time(&self, cost: f64) -> Duration {
        let mut bucket = self.state.lock();
        bucket.refill(self.clock.now());
        if bucket.balance >= cost {
            return Duration::ZERO;
        }
        if bucket.credits_per_second <= 0.0 {
            return Duration::MAX;
        }

        let nanos = ((cost - bucket.balance) * 1e9 / bucket.credits_per_second).ceil();
        if nanos >= u64::MAX as f64 {
            Duration::MAX
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }

    /// Current balance after crediting elapsed time
    pub fn balance(&self) -> f64 {
        let mut bucket = self.state.lock();
        bucket.refill(self.clock.now());
        bucket.balance
    }

    /// Replenishment rate in credits per second
    pub fn credits_per_second(&self) -> f64 {
        self.state.lock().credits_per_second
    }

    /// Balance ceiling
    pub fn max_balance(&self) -> f64 {
        self.state.lock().max_balance
    }

    /// Change rate and ceiling in place
    ///
    /// Time elapsed so far is credited at the old rate, then the balance is
    /// scaled to keep the same fraction of the new ceiling.
    pub fn update(&self, credits_per_second: f64, max_balance: f64) -> RateLimitResult<()> {
        validate("credits_per_second", credits_per_second)?;
        validate("max_balance", max_balance)?;

        let mut bucket = self.state.lock();
        bucket.refill(self.clock.now());
        if bucket.max_balance > 0.0 {
            bucket.balance = bucket.balance * max_balance / bucket.max_balance;
        }
        bucket.credits_per_second = credits_per_second;
        bucket.max_balance = max_balance;
        bucket.balance = bucket.balance.clamp(0.0, max_balance);

        debug!(credits_per_second, max_balance, "Reconfigured rate limiter");
        Ok(())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

fn validate(name: &'static str, value: f64) -> RateLimitResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RateLimitError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn frozen(rate: f64, max: f64) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(rate, max, Arc::clone(&clock) as Arc<dyn Clock>)
            .unwrap();
        (limiter, clock)
    }

    #[test]
    fn test_rate_limiter() {
        let (limiter, clock) = frozen(2.0, 2.0);
        assert!(limiter.check_credit(1.0));
        assert!(limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));

        // 250ms at 2/s is half a credit
        clock.advance(Duration::from_millis(250));
        assert!(!limiter.check_credit(1.0));

        // another 500ms brings the balance to 1.5
        clock.advance(Duration::from_millis(500));
        assert!(limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));

        // five seconds would be ten credits, but the ceiling is two
        clock.advance(Duration::from_millis(4250));
        assert!(limiter.check_credit(1.0));
        assert!(limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));
    }

    #[test]
    fn test_max_balance() {
        let (limiter, clock) = frozen(0.1, 1.0);
        assert!(limiter.check_credit(1.0));

        clock.advance(Duration::from_secs(20));
        assert!(limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));
    }

    #[test]
    fn test_fractional_costs() {
        let (limiter, _clock) = frozen(100.0, 10.0);
        assert!(limiter.check_credit(2.5));
        assert!(limiter.check_credit(7.5));
        assert!(!limiter.check_credit(0.1));
        assert!(limiter.check_credit(0.0));
    }

    #[test]
    fn test_failed_check_keeps_balance() {
        let (limiter, _clock) = frozen(1.0, 3.0);
        assert!(!limiter.check_credit(5.0));
        assert_eq!(limiter.balance(), 3.0);
    }

    #[test]
    fn test_drain() {
        let (limiter, clock) = frozen(2.0, 4.0);
        assert!(limiter.check_credit(1.0));
        assert_eq!(limiter.drain(), 3.0);
        assert_eq!(limiter.drain(), 0.0);

        clock.advance(Duration::from_millis(500));
        assert_eq!(limiter.drain(), 1.0);
    }

    #[test]
    fn test_determine_wait_time() {
        let (limiter, clock) = frozen(1.0, 1.0);
        assert_eq!(limiter.determine_wait_time(1.0), Duration::ZERO);

        assert!(limiter.check_credit(1.0));
        assert!(!limiter.check_credit(1.0));

        let wait = limiter.determine_wait_time(1.0);
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(1));

        clock.advance(wait);
        assert_eq!(limiter.determine_wait_time(1.0), Duration::ZERO);
        assert!(limiter.check_credit(1.0));
    }

    #[test]
    fn test_wait_time_after_drain() {
        let (limiter, clock) = frozen(2.0, 2.0);
        limiter.drain();
        let wait = limiter.determine_wait_time(1.0);
        assert_eq!(wait, Duration::from_millis(500));

        clock.advance(wait);
        assert!(limiter.check_credit(1.0));
    }

    #[test]
    fn test_wait_time_without_refill() {
        let (limiter, _clock) = frozen(0.0, 1.0);
        limiter.drain();
        assert_eq!(limiter.determine_wait_time(1.0), Duration::MAX);
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let (limiter, clock) = frozen(1.0, 10.0);
        limiter.drain();
        clock.advance(Duration::from_secs(2));
        assert_eq!(limiter.balance(), 2.0);

        clock.rewind(Duration::from_secs(1));
        assert_eq!(limiter.balance(), 2.0);

        // time already credited is not credited twice
        clock.advance(Duration::from_secs(1));
        assert_eq!(limiter.balance(), 2.0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(limiter.balance(), 3.0);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            RateLimiter::new(-1.0, 1.0),
            Err(RateLimitError::InvalidParameter { name: "credits_per_second", .. })
        ));
        assert!(matches!(
            RateLimiter::new(1.0, -1.0),
            Err(RateLimitError::InvalidParameter { name: "max_balance", .. })
        ));
        assert!(RateLimiter::new(f64::NAN, 1.0).is_err());
        assert!(RateLimiter::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_update_rescales_balance() {
        let (limiter, clock) = frozen(1.0, 4.0);
        assert!(limiter.check_credit(2.0));

        limiter.update(2.0, 8.0).unwrap();
        assert_eq!(limiter.balance(), 4.0);
        assert_eq!(limiter.max_balance(), 8.0);
        assert_eq!(limiter.credits_per_second(), 2.0);

        clock.advance(Duration::from_secs(1));
        assert_eq!(limiter.balance(), 6.0);

        assert!(limiter.update(-2.0, 8.0).is_err());
        assert_eq!(limiter.credits_per_second(), 2.0);
    }

    #[test]
    fn test_concurrent_exact_drain() {
        let (limiter, _clock) = frozen(0.0, 100.0);
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..20).filter(|_| limiter.check_credit(1.0)).count()
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 100);
        assert_eq!(limiter.balance(), 0.0);
    }
}
