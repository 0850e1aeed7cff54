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
//! Basic logging example demonstrating the output formats.
//!
//! Run with: cargo run -p meterkit-observability --example basic_logging -- <format>
//! Where <format> is one of: pretty, compact, json

use meterkit_observability::{init_tracing, LogFormat};
use std::env;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let format = env::args()
        .nth(1)
        .map(|s| s.parse::<LogFormat>())
        .transpose()?
        .unwrap_or_default();

    init_tracing(format, Some("debug"))?;
    tracing::info!(?format, "Logging initialized");

    let span = tracing::debug_span!("flush", sink = "stdout");
    let _guard = span.enter();
    tracing::debug!(series = 12, "Flushing snapshot");
    std::thread::sleep(Duration::from_millis(5));
    tracing::warn!(dropped = 3, "Rate limited log lines");

    Ok(())
}
