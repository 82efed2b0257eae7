// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable `ScriptEngine` for `hive-engine` tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hive_core::{LoginOutcome, RunWaitHint};
use parking_lot::Mutex;

use crate::engine::{RunOutcome, ScriptEngine};
use crate::suspend::Suspend;

/// One recorded call, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCall {
    Login { username: String },
    Run { module: String },
    DeliverStatus { module: String, settings: Vec<(String, String)> },
}

struct FakeState {
    calls: Vec<ScriptCall>,
    login_outcome: LoginOutcome,
    run_outcomes: HashMap<String, RunOutcome>,
    default_run_outcome: RunOutcome,
}

/// Fake [`ScriptEngine`]: outcomes are scripted per-module via
/// [`FakeScriptEngine::script_run`], falling back to
/// [`FakeScriptEngine::set_default_run_outcome`] when nothing matches.
/// All calls run to completion synchronously — suspension is a real
/// interpreter's concern, not this reference double's.
#[derive(Clone)]
pub struct FakeScriptEngine {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeScriptEngine {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                login_outcome: LoginOutcome::Success,
                run_outcomes: HashMap::new(),
                default_run_outcome: RunOutcome::Finished(RunWaitHint::Default),
            })),
        }
    }
}

impl FakeScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ScriptCall> {
        self.inner.lock().calls.clone()
    }

    pub fn set_login_outcome(&self, outcome: LoginOutcome) {
        self.inner.lock().login_outcome = outcome;
    }

    pub fn script_run(&self, module: impl Into<String>, outcome: RunOutcome) {
        self.inner.lock().run_outcomes.insert(module.into(), outcome);
    }

    pub fn set_default_run_outcome(&self, outcome: RunOutcome) {
        self.inner.lock().default_run_outcome = outcome;
    }
}

#[async_trait]
impl ScriptEngine for FakeScriptEngine {
    async fn call_login(&self, username: &str, _password: &str) -> LoginOutcome {
        let mut inner = self.inner.lock();
        inner.calls.push(ScriptCall::Login {
            username: username.to_string(),
        });
        inner.login_outcome.clone()
    }

    async fn call_run(&self, module: &str) -> Suspend<RunOutcome> {
        let mut inner = self.inner.lock();
        inner.calls.push(ScriptCall::Run { module: module.to_string() });
        let outcome = inner
            .run_outcomes
            .get(module)
            .cloned()
            .unwrap_or_else(|| inner.default_run_outcome.clone());
        Suspend::ready(outcome)
    }

    async fn deliver_status(&self, module: &str, settings: &HashMap<String, String>) {
        let mut entries: Vec<(String, String)> = settings.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        entries.sort();
        self.inner.lock().calls.push(ScriptCall::DeliverStatus {
            module: module.to_string(),
            settings: entries,
        });
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
