// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-agent Observer log feed.
//!
//! This is distinct from `tracing`, which the runtime also uses for
//! operator-facing diagnostics — this module formats the product-facing
//! line that rides on the Observer callback under the reserved key
//! `"log"`.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Bound on the per-agent log FIFO.
pub const LOG_BUFFER_CAPACITY: usize = 50;

/// Log levels, rendered as fixed 5-character tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Format one Observer log line: `"[LEVEL][DD.MM HH:MM:SS][<20 id>][<8 source>] message\n"`.
pub fn format_log_line(
    level: LogLevel,
    at: DateTime<Utc>,
    identifier: &str,
    source: &str,
    message: &str,
) -> String {
    format!(
        "[{}][{}][{:>20}][{:>8}] {}\n",
        level.tag(),
        at.format("%d.%m %H:%M:%S"),
        identifier,
        source,
        message
    )
}

/// Bounded FIFO of formatted log lines for one agent: never exceeds 50
/// entries; overflow drops the oldest.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() >= LOG_BUFFER_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
