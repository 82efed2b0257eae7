// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent controller: initialization, login retry, command routing,
//! and per-module scheduling.
//!
//! A module's `RUN`/`WAIT` lifecycle is one long-lived task per running
//! module: the task's `tokio::time::sleep` between runs *is* the wait
//! timer, so cancelling it is a plain `JoinHandle::abort` rather than a
//! separate timer handle. State transitions driven by that task use a
//! blocking `.lock().await`; commands arriving from `execute` use
//! `try_lock` and drop the command on contention rather than block the
//! caller on a busy module.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hive_config::Config;
use hive_core::{
    compute_identifier, dependent_variables, module_key, parse_sentinel, shared_key,
    LogBuffer, LogLevel, LoginOutcome, ModuleRecord, ModuleState, Package, RunWaitHint,
    SeededSequence, SentinelMode, WaitTimeFactor, ACTIVE_KEY, BASE_MODULE, DEFAULT_WAIT_MAX,
    DEFAULT_WAIT_MIN, MAX_LOGIN_ATTEMPTS, SHARED_NAMESPACE,
};
use hive_http::{HttpProxyPredicate, HttpSession};
use hive_script::{RunOutcome, ScriptEngine};
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Duration;

use crate::error::EngineError;
use crate::observer::{notify, NullObserver, Observer};
use crate::registry::Runtime;

/// Checks one proxy candidate, both during `init`'s initial
/// verification and `base_set_proxy`. The engine only orchestrates the
/// parallel verification and the resulting proxy swap; what request to
/// send and what response counts as "good" is a caller concern —
/// [`hive_http::HttpProxyPredicate`] is the production implementation
/// that actually issues the probe request.
#[async_trait]
pub trait ProxyPredicate: Send + Sync + 'static {
    async fn check(&self, proxy: String) -> bool;
}

#[async_trait]
impl<Factory, S, F> ProxyPredicate for HttpProxyPredicate<Factory, S, F>
where
    Factory: Fn() -> Result<S, hive_http::HttpError> + Send + Sync + 'static,
    S: HttpSession,
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    async fn check(&self, proxy: String) -> bool {
        HttpProxyPredicate::check(self, proxy).await
    }
}

struct ModuleSlot {
    record: AsyncMutex<ModuleRecord>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

/// One scripted actor: credentials, package, HTTP session, and a set of
/// independently scheduled modules.
pub struct Agent<C: Config + 'static, S: HttpSession, E: ScriptEngine> {
    identifier: String,
    config: Mutex<C>,
    #[allow(dead_code)]
    package: Arc<Package>,
    session: S,
    engine: Arc<E>,
    log: Mutex<LogBuffer>,
    wait_time_factor: Mutex<WaitTimeFactor>,
    sequence: Mutex<SeededSequence>,
    observer: Mutex<Arc<dyn Observer>>,
    proxy_predicate: Arc<dyn ProxyPredicate>,
    proxy_check_active: AtomicBool,
    proxy_rotation: Mutex<usize>,
    modules: HashMap<String, ModuleSlot>,
    module_order: Vec<String>,
}

impl<C: Config + 'static, S: HttpSession, E: ScriptEngine> Agent<C, S, E> {
    /// Validate `config`, resolve the package, compute the identifier,
    /// register the agent, drive login, and replay
    /// `config.init_command_sequence()`.
    pub async fn init(
        config: C,
        session: S,
        engine: Arc<E>,
        observer: Arc<dyn Observer>,
        proxy_predicate: Arc<dyn ProxyPredicate>,
        runtime: &Runtime<C, S, E>,
    ) -> Result<Arc<Self>, EngineError> {
        if !config.valid() {
            return Err(EngineError::InvalidConfig);
        }

        let package = runtime
            .package(config.package())
            .ok_or_else(|| EngineError::UnknownPackage(config.package().to_string()))?;

        let identifier =
            compute_identifier(config.username(), config.package(), config.server(), &package.servers)
                .to_string();

        let wait_time_factor = WaitTimeFactor::parse(&config.value_of("base_wait_time_factor"))
            .unwrap_or_default();

        let mut module_order: Vec<String> = package.real_module_names().map(str::to_string).collect();
        module_order.sort();

        let mut modules = HashMap::new();
        for name in &module_order {
            let mut record = ModuleRecord::new(name.clone(), identifier.clone());
            if let Some(settings) = config.module_settings().get(name.as_str()) {
                record.active = settings.get(ACTIVE_KEY).map(String::as_str) == Some("1");
                record.settings = settings
                    .iter()
                    .filter(|(key, _)| key.as_str() != ACTIVE_KEY)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
            }
            modules.insert(
                name.clone(),
                ModuleSlot {
                    record: AsyncMutex::new(record),
                    task: Mutex::new(None),
                },
            );
        }

        let agent = Arc::new(Self {
            identifier: identifier.clone(),
            config: Mutex::new(config),
            package,
            session,
            engine,
            log: Mutex::new(LogBuffer::new()),
            wait_time_factor: Mutex::new(wait_time_factor),
            sequence: Mutex::new(SeededSequence::new()),
            observer: Mutex::new(observer),
            proxy_predicate,
            proxy_check_active: AtomicBool::new(false),
            proxy_rotation: Mutex::new(0),
            modules,
            module_order,
        });

        runtime.register_agent(Arc::clone(&agent))?;

        if let Err(err) = agent.verify_initial_proxies().await {
            runtime.unregister_agent(&identifier);
            return Err(err);
        }

        if let Err(err) = agent.run_login().await {
            runtime.unregister_agent(&identifier);
            return Err(err);
        }

        let sequence = agent.config.lock().init_command_sequence();
        for (command, argument) in sequence {
            agent.execute(&command, &argument);
        }

        Ok(agent)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn session_handle(&self) -> S {
        self.session.clone()
    }

    /// Read the flat status map.
    pub fn status(&self, key: &str) -> String {
        self.config.lock().value_of(key)
    }

    /// Write the flat status map, publishing to the observer and, for
    /// `shared_*` keys, fanning out to every sentinel-dependent module
    /// setting.
    pub fn set_status(&self, key: &str, value: &str) {
        self.config.lock().set_flat(key, value);
        self.publish(key, value);

        if let Some(shared_name) = key.strip_prefix(&format!("{SHARED_NAMESPACE}_")) {
            let settings_snapshot = self.config.lock().module_settings().clone();
            for (module, dep_key) in dependent_variables(&settings_snapshot, shared_name) {
                self.publish(&module_key(module, dep_key), value);
            }
        }
    }

    /// `agent.random(a, b)`.
    pub fn random(&self, a: f64, b: f64) -> f64 {
        let factor = *self.wait_time_factor.lock();
        let mut sequence = self.sequence.lock();
        hive_core::random(&mut sequence, a, b, factor)
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log.lock().iter().cloned().collect()
    }

    pub fn log_line(&self, level: LogLevel, source: &str, message: &str) {
        let line = hive_core::format_log_line(level, chrono::Utc::now(), &self.identifier, source, message);
        self.log.lock().push(line.clone());
        self.publish("log", line.trim_end_matches('\n'));
    }

    fn publish(&self, key: &str, value: &str) {
        let observer = self.observer.lock().clone();
        notify(observer.as_ref(), &self.identifier, key, value);
    }

    fn clear_observer(&self) {
        *self.observer.lock() = Arc::new(NullObserver);
    }

    // --- Login ----------------------------------------------------------

    fn proxy_candidates(&self) -> Vec<String> {
        self.config
            .lock()
            .value_of("base_proxy")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    async fn rotate_proxy(&self) {
        let candidates = self.proxy_candidates();
        if candidates.is_empty() {
            self.session.change_proxy(None).await;
            return;
        }
        let index = {
            let mut index = self.proxy_rotation.lock();
            *index = (*index + 1) % candidates.len();
            *index
        };
        self.session.change_proxy(Some(candidates[index].clone())).await;
    }

    /// Verify the configured `base_proxy` list, if any, before the first
    /// login attempt: every candidate is checked in parallel against
    /// `proxy_predicate`, the session adopts the first survivor, and
    /// `base_proxy` is republished as the surviving subset. An agent
    /// configured with no proxies skips this step entirely. Fails with
    /// [`EngineError::ProxyVerification`] when every candidate fails.
    async fn verify_initial_proxies(&self) -> Result<(), EngineError> {
        let candidates = self.proxy_candidates();
        if candidates.is_empty() {
            return Ok(());
        }

        let predicate = Arc::clone(&self.proxy_predicate);
        let good = hive_http::verify_proxies(candidates, move |proxy: String| {
            let predicate = Arc::clone(&predicate);
            async move { predicate.check(proxy).await }
        })
        .await;

        if good.is_empty() {
            return Err(EngineError::ProxyVerification("no working proxy found".to_string()));
        }

        self.session.change_proxy(Some(good[0].clone())).await;
        self.set_status("base_proxy", &good.join(","));
        Ok(())
    }

    /// The login retry protocol: up to [`MAX_LOGIN_ATTEMPTS`], rotating
    /// the proxy before each retry after the first.
    async fn run_login(&self) -> Result<(), EngineError> {
        let (username, password) = {
            let config = self.config.lock();
            (config.username().to_string(), config.password().to_string())
        };

        let mut last_error: Option<String> = None;
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            if attempt > 1 {
                self.rotate_proxy().await;
            }
            self.log_line(LogLevel::Info, BASE_MODULE, &format!("login: {attempt}. try"));

            match self.engine.call_login(&username, &password).await {
                LoginOutcome::Success => return Ok(()),
                LoginOutcome::BadCredentials => last_error = None,
                LoginOutcome::Error(message) => last_error = Some(message),
            }
        }

        Err(EngineError::LoginFailed(
            last_error.unwrap_or_else(|| "Login -> not logged in (wrong login data?)".to_string()),
        ))
    }

    async fn relogin(self: &Arc<Self>) {
        if let Err(err) = self.run_login().await {
            self.log_line(LogLevel::Error, BASE_MODULE, &err.to_string());
        }
    }

    // --- Command routing ------------------

    /// Apply the five command-routing rules in order.
    pub fn execute(self: &Arc<Self>, command: &str, argument: &str) {
        if let Some((module, key)) = command.split_once("_set_") {
            if self.modules.contains_key(module) {
                let existing = self.config.lock().value_of(&module_key(module, key));
                if let Some(shared_name) = existing.strip_prefix('^') {
                    return self.execute(&format!("shared_set_{shared_name}"), argument);
                }
            }
        }

        if command == "base_set_wait_time_factor" {
            return self.handle_wait_time_factor(argument);
        }
        if command == "base_set_proxy" {
            return self.handle_set_proxy(argument);
        }
        if let Some(shared_name) = command.strip_prefix("shared_set_") {
            return self.set_status(&shared_key(shared_name), argument);
        }

        self.forward_to_modules(command, argument);
    }

    fn handle_wait_time_factor(self: &Arc<Self>, argument: &str) {
        match WaitTimeFactor::parse(argument) {
            Some(factor) => {
                *self.wait_time_factor.lock() = factor;
                let rendered = factor.to_string();
                self.config.lock().set_flat("base_wait_time_factor", &rendered);
                self.log_line(LogLevel::Info, BASE_MODULE, &format!("wait_time_factor -> {rendered}"));
                self.publish("base_wait_time_factor", &rendered);
            }
            None => {
                let current = self.wait_time_factor.lock().to_string();
                self.log_line(
                    LogLevel::Error,
                    BASE_MODULE,
                    &format!("invalid wait_time_factor {argument:?}, keeping {current}"),
                );
                self.publish("base_wait_time_factor", &current);
            }
        }
    }

    fn handle_set_proxy(self: &Arc<Self>, argument: &str) {
        if self.proxy_check_active.swap(true, Ordering::SeqCst) {
            self.log_line(LogLevel::Info, BASE_MODULE, "proxy check already active, dropping request");
            return;
        }

        let proxies: Vec<String> =
            argument.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
        let previous = self.config.lock().value_of("base_proxy");
        let agent = Arc::clone(self);
        tokio::spawn(async move { agent.run_proxy_check(proxies, previous).await });
    }

    async fn run_proxy_check(self: Arc<Self>, proxies: Vec<String>, previous: String) {
        let predicate = Arc::clone(&self.proxy_predicate);
        let good = hive_http::verify_proxies(proxies, move |proxy: String| {
            let predicate = Arc::clone(&predicate);
            async move { predicate.check(proxy).await }
        })
        .await;

        self.proxy_check_active.store(false, Ordering::SeqCst);

        if good.is_empty() {
            self.log_line(LogLevel::Error, BASE_MODULE, "proxy check found no surviving candidates");
            self.set_status("base_proxy", &previous);
            return;
        }

        self.session.change_proxy(Some(good[0].clone())).await;
        self.set_status("base_proxy", &good.join(","));
        self.relogin().await;
    }

    fn forward_to_modules(self: &Arc<Self>, command: &str, argument: &str) {
        for module in &self.module_order {
            if let Some(key) = command.strip_prefix(&format!("{module}_set_")) {
                self.handle_module_command(module, key, argument);
            } else if let Some(key) = command.strip_prefix("global_set_") {
                self.handle_module_command(module, key, argument);
            }
        }
    }

    // --- Module scheduler ------------------------------------

    fn handle_module_command(self: &Arc<Self>, module: &str, key: &str, value: &str) {
        let Some(slot) = self.modules.get(module) else { return };
        let mut record = match slot.record.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.log_line(
                    LogLevel::Info,
                    module,
                    &format!("dropped command {module}_set_{key}: module busy"),
                );
                return;
            }
        };

        if key == ACTIVE_KEY {
            let want_active = value == "1";
            match (record.state, want_active) {
                (ModuleState::Off, true) => {
                    record.state = ModuleState::Run;
                    record.active = true;
                    drop(record);
                    self.spawn_run_loop(module);
                }
                (ModuleState::StopRun, true) => {
                    record.state = ModuleState::Run;
                    record.active = true;
                }
                (ModuleState::Wait, true) => {
                    record.state = ModuleState::Run;
                    record.active = true;
                    drop(record);
                    self.abort_task(module);
                    self.spawn_run_loop(module);
                }
                (ModuleState::Run, false) => {
                    record.state = ModuleState::StopRun;
                    record.active = false;
                }
                (ModuleState::Wait, false) => {
                    record.state = ModuleState::Off;
                    record.active = false;
                    drop(record);
                    self.abort_task(module);
                    self.publish_module_active(module, false);
                }
                _ => {}
            }
        } else {
            let changed = record.settings.get(key).map(String::as_str) != Some(value);
            record.settings.insert(key.to_string(), value.to_string());
            drop(record);
            // Repeating the same write is a no-op: only the value-changing
            // call publishes.
            if changed {
                self.set_status(&module_key(module, key), value);
            }
        }
    }

    fn publish_module_active(&self, module: &str, active: bool) {
        let value = if active { "1" } else { "0" };
        self.config.lock().set_flat(&module_key(module, ACTIVE_KEY), value);
        self.publish(&module_key(module, ACTIVE_KEY), value);
    }

    fn spawn_run_loop(self: &Arc<Self>, module: &str) {
        let Some(slot) = self.modules.get(module) else { return };
        let agent = Arc::clone(self);
        let module_owned = module.to_string();
        let handle = tokio::spawn(async move { agent.run_module_loop(module_owned).await });
        *slot.task.lock() = Some(handle);
    }

    fn abort_task(&self, module: &str) {
        if let Some(slot) = self.modules.get(module) {
            if let Some(handle) = slot.task.lock().take() {
                handle.abort();
            }
        }
    }

    async fn deliver_settings(&self, module: &str) {
        let Some(slot) = self.modules.get(module) else { return };
        let raw_settings = slot.record.lock().await.settings.clone();
        let shared = self.config.lock().module_settings().get(SHARED_NAMESPACE).cloned().unwrap_or_default();

        let mut resolved = HashMap::new();
        for (key, raw) in raw_settings {
            let value = match parse_sentinel(&raw).mode {
                SentinelMode::None => raw,
                SentinelMode::Read | SentinelMode::ReadWrite => {
                    let name = parse_sentinel(&raw).shared_name.unwrap_or_default().to_string();
                    shared.get(&name).cloned().unwrap_or_default()
                }
            };
            resolved.insert(key, value);
        }

        self.engine.deliver_status(module, &resolved).await;
    }

    fn resolve_wait_hint(&self, hint: RunWaitHint) -> f64 {
        match hint {
            RunWaitHint::Range(min, max) => self.random(min, max),
            RunWaitHint::Fixed(n) => n,
            RunWaitHint::Default => self.random(DEFAULT_WAIT_MIN, DEFAULT_WAIT_MAX),
        }
    }

    /// The body of one running module: alternates script runs with wait
    /// sleeps until a stop is honored. The
    /// `tokio::time::sleep` below doubles as the `WAIT` state's deadline
    /// timer — aborting this task's `JoinHandle` cancels it.
    async fn run_module_loop(self: Arc<Self>, module: String) {
        loop {
            let Some(slot) = self.modules.get(&module) else { return };

            {
                let mut record = slot.record.lock().await;
                if record.state == ModuleState::StopRun {
                    record.state = ModuleState::Off;
                    record.active = false;
                    drop(record);
                    self.publish_module_active(&module, false);
                    return;
                }
                record.state = ModuleState::Run;
            }

            self.deliver_settings(&module).await;
            let outcome = self.engine.call_run(&module).await.resolve().await;

            let stopped = slot.record.lock().await.state == ModuleState::StopRun;
            if stopped {
                let mut record = slot.record.lock().await;
                record.state = ModuleState::Off;
                record.active = false;
                drop(record);
                self.publish_module_active(&module, false);
                return;
            }

            let wait_secs = match outcome {
                RunOutcome::Finished(hint) => self.resolve_wait_hint(hint),
                RunOutcome::Error(message) => {
                    self.log_line(LogLevel::Error, &module, &message);
                    self.random(DEFAULT_WAIT_MIN, DEFAULT_WAIT_MAX)
                }
            };

            {
                let mut record = slot.record.lock().await;
                record.state = ModuleState::Wait;
            }
            tokio::time::sleep(Duration::from_secs_f64(wait_secs.max(0.0))).await;
        }
    }

    pub async fn module_state(&self, module: &str) -> Option<ModuleState> {
        let slot = self.modules.get(module)?;
        Some(slot.record.lock().await.state)
    }

    // --- Shutdown ---------------------------------------------------------

    /// `global_set_active = "0"`, wait for every module to reach `OFF`,
    /// clear the observer, unregister.
    pub async fn shutdown(self: &Arc<Self>, runtime: &Runtime<C, S, E>) {
        self.execute("global_set_active", "0");

        for module in &self.module_order {
            loop {
                let state = self.module_state(module).await;
                if matches!(state, None | Some(ModuleState::Off)) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        self.clear_observer();
        runtime.unregister_agent(&self.identifier);
    }
}

/// Boxed async predicate adapter, handy for wiring closures into
/// [`ProxyPredicate`] without a bespoke type per call site.
pub struct FnProxyPredicate<F> {
    f: F,
}

impl<F> FnProxyPredicate<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ProxyPredicate for FnProxyPredicate<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn check(&self, proxy: String) -> bool {
        let fut: Pin<Box<dyn Future<Output = bool> + Send>> = Box::pin((self.f)(proxy));
        fut.await
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
