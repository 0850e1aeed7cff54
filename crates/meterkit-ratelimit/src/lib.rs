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
//! Meterkit Rate Limiting
//!
//! A leaky-bucket limiter expressed as a continuously refilling credit
//! balance, used to throttle emission of logs, spans and other events.
//!
//! # Example
//!
//! ```
//! use meterkit_ratelimit::RateLimiter;
//!
//! // ten messages per second, bursts of up to twenty
//! let limiter = RateLimiter::new(10.0, 20.0).unwrap();
//! if limiter.check_credit(1.0) {
//!     // emit the message
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RateLimiterConfig;
pub use error::{RateLimitError, RateLimitResult};
pub use limiter::RateLimiter;
