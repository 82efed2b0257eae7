// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module data record and scheduler state machine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reserved per-module status key toggling `run_<name>` scheduling.
pub const ACTIVE_KEY: &str = "active";

/// One module's scheduler state.
///
/// ```text
/// OFF --start--> RUN --script-finish--> WAIT --timer-fires--> RUN
///  ^               |                       |
///  |               +--stop--> STOP_RUN -----+ (timer cancelled)
///  |                                        |
///  +-------------------run-returns----------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleState {
    Off,
    Run,
    StopRun,
    Wait,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleState::Off => write!(f, "off"),
            ModuleState::Run => write!(f, "run"),
            ModuleState::StopRun => write!(f, "stop_run"),
            ModuleState::Wait => write!(f, "wait"),
        }
    }
}

/// A module's scheduler-relevant record.
///
/// Holds a non-owning back-reference (the agent's identifier, not an
/// `Arc<Agent>`) to break the Agent<->Module ownership cycle — the
/// agent outlives its modules by construction (shutdown waits for all
/// of them to reach `Off`).
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    pub name: String,
    pub agent_identifier: String,
    pub state: ModuleState,
    pub active: bool,
    /// Mirror of `<module>_<key>` settings (excluding `active`), as last
    /// published to the agent's status table.
    pub settings: HashMap<String, String>,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, agent_identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent_identifier: agent_identifier.into(),
            state: ModuleState::Off,
            active: false,
            settings: HashMap::new(),
        }
    }

    /// Whether this module currently has an armed wait timer.
    pub fn has_timer(&self) -> bool {
        matches!(self.state, ModuleState::Wait)
    }
}

/// The outcome of a `run_<name>` script invocation, prior to being
/// turned into a wait interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunWaitHint {
    /// Script returned `(min, max)` with both `>= 0`.
    Range(f64, f64),
    /// Script returned a single `n >= 0` (or only `min >= 0`).
    Fixed(f64),
    /// Script returned neither — fall back to `agent.random(60, 120)`.
    Default,
}

/// Default wait bounds used for `RunWaitHint::Default` and for retry
/// backoff after a script error.
pub const DEFAULT_WAIT_MIN: f64 = 60.0;
pub const DEFAULT_WAIT_MAX: f64 = 120.0;

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
