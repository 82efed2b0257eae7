// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScriptEngine`: one interpreter state per (agent, module).
//!
//! A real embedded-language interpreter is out of scope —
//! callers plug in their own impl; [`crate::FakeScriptEngine`] is the
//! reference implementation exercised by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use hive_core::{LoginOutcome, RunWaitHint};

use crate::suspend::Suspend;

/// Outcome of one `run_<module>` invocation.
///
/// A script that calls `on_finish()` a second time, or returns without
/// ever calling it despite suspending, is reported as `Error` — an entry
/// point must call `on_finish` exactly once; violations are a script
/// error, not a host panic. A clean
/// finish carries the script's `(min, max)`/`n`/nothing return value as
/// a [`RunWaitHint`] — the scheduler's only source for the next wait
/// interval.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Finished(RunWaitHint),
    Error(String),
}

/// One interpreter state, live for exactly one (agent, module) pair.
#[async_trait]
pub trait ScriptEngine: Send + Sync + 'static {
    /// Run the `base` package's `login(username, password)` function on a
    /// fresh interpreter state.
    async fn call_login(&self, username: &str, password: &str) -> LoginOutcome;

    /// Run `module`'s entry point. May suspend on a capability call.
    async fn call_run(&self, module: &str) -> Suspend<RunOutcome>;

    /// Mirror the module's settings into the interpreter's status view
    /// before the module's first run.
    async fn deliver_status(&self, module: &str, settings: &HashMap<String, String>);
}
