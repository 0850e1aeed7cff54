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
//! Global subscriber installation
//!
//! Kept to a single test so this binary owns the process-wide subscriber.

use meterkit_observability::{init_tracing, init_tracing_with_config, LogConfig, LogError, LogFormat};

#[test]
fn test_second_initialization_is_rejected() -> anyhow::Result<()> {
    init_tracing(LogFormat::Compact, Some("debug"))?;
    tracing::debug!(attempt = 1, "subscriber installed");

    let again = init_tracing_with_config(LogConfig::new().with_format(LogFormat::Json));
    assert!(matches!(again, Err(LogError::AlreadyInitialized)));
    Ok(())
}
