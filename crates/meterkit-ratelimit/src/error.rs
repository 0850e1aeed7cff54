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
use thiserror::Error;

/// Errors raised when building or reconfiguring a rate limiter
#[derive(Error, Debug, PartialEq)]
pub enum RateLimitError {
    #[error("Invalid {name}: {value}. Must be a finite, non-negative number")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Failed to parse rate limiter configuration: {0}")]
    ConfigParse(String),
}

impl From<toml::de::Error> for RateLimitError {
    fn from(err: toml::de::Error) -> Self {
        RateLimitError::ConfigParse(err.to_string())
    }
}

/// Result alias for rate limiter operations
pub type RateLimitResult<T> = Result<T, RateLimitError>;
