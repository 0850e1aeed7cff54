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
//! Serializable limiter settings

use serde::{Deserialize, Serialize};

use crate::error::RateLimitResult;
use crate::limiter::RateLimiter;

/// Settings for a [`RateLimiter`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Credits added per second
    pub credits_per_second: f64,

    /// Balance ceiling, also the starting balance
    pub max_balance: f64,
}

impl RateLimiterConfig {
    /// Create a config
    pub fn new(credits_per_second: f64, max_balance: f64) -> Self {
        Self {
            credits_per_second,
            max_balance,
        }
    }

    /// Parse a config from TOML
    pub fn from_toml_str(content: &str) -> RateLimitResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build a limiter on the system clock
    pub fn build(&self) -> RateLimitResult<RateLimiter> {
        RateLimiter::new(self.credits_per_second, self.max_balance)
    }
}
