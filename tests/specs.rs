//! End-to-end behavioral scenarios for the agent runtime, exercised
//! through the public crate APIs only (no CLI scaffolding).

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hive_config::{Config, InMemoryConfig};
use hive_core::{
    compute_identifier, random, LogBuffer, LoginOutcome, ModuleState, Package, RunWaitHint,
    SeededSequence, WaitTimeFactor, INITIAL_SEED, LOG_BUFFER_CAPACITY,
};
use hive_engine::{Agent, EngineError, FakeObserver, Observer, ProxyPredicate, Runtime};
use hive_http::{FakeHttpSession, HttpCall};
use hive_package::ScriptValue;
use hive_script::{FakeScriptEngine, RunOutcome, ScriptCall, ScriptEngine};

struct AlwaysGood;

#[async_trait]
impl ProxyPredicate for AlwaysGood {
    async fn check(&self, _proxy: String) -> bool {
        true
    }
}

fn package(name: &str, servers: &[(&str, &str)], modules: &[&str]) -> Arc<Package> {
    let mut scripts = HashMap::new();
    scripts.insert("base".to_string(), String::new());
    scripts.insert("servers".to_string(), String::new());
    for module in modules {
        scripts.insert((*module).to_string(), String::new());
    }
    Arc::new(Package {
        name: name.to_string(),
        servers: servers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        modules: scripts,
        interface_json: ScriptValue::Other.to_json(),
    })
}

// --- S1: config round trip --------------------------------------------

#[test]
fn s1_config_round_trip() {
    let raw = r#"{"username":"test_user","password":"test_password","package":"te",
 "server":"http://test.example.com",
 "modules":{"mod1":{"active":"0","a":"b","c":"d"},
            "mod2":{"active":"1","e":"f","g":"h"},
            "base":{"wait_time_factor":"2.00","proxy":"127.0.0.1:9000"}}}"#;

    let config = InMemoryConfig::from_json(raw, "ignored-identifier").expect("valid json");

    assert_eq!(config.value_of("base_wait_time_factor"), "2.00");
    assert_eq!(config.module_settings()["mod2"]["e"], "f");

    let sequence = config.init_command_sequence();
    assert_eq!(sequence.len(), 7);
    assert_eq!(sequence[0], ("base_set_wait_time_factor".to_string(), "2.00".to_string()));
    assert_eq!(sequence.last().unwrap(), &("mod2_set_active".to_string(), "1".to_string()));
}

#[test]
fn config_to_json_round_trips_every_field_except_the_password_when_excluded() {
    let mut config = InMemoryConfig::new("alice", "s3cr3t", "te", "http://example.test", "te_tx_alice");
    config.set("mod1", "a", "b");
    config.set_cookies(HashMap::from([("session".to_string(), "abc".to_string())]));

    let with_password = config.to_json(true);
    assert!(with_password.contains("s3cr3t"));

    let without_password = config.to_json(false);
    assert!(!without_password.contains("s3cr3t"));

    let reparsed = InMemoryConfig::from_json(&with_password, config.identifier().to_string()).unwrap();
    assert_eq!(reparsed.username(), config.username());
    assert_eq!(reparsed.password(), config.password());
    assert_eq!(reparsed.package(), config.package());
    assert_eq!(reparsed.server(), config.server());
    assert_eq!(reparsed.module_settings(), config.module_settings());
    assert_eq!(reparsed.cookies(), config.cookies());
}

// --- S2: identifier determinism -----------------------------------------

#[test]
fn s2_identifier_is_pure_and_falls_through_for_unknown_servers() {
    let servers = HashMap::from([("http://test.example.com".to_string(), "tx".to_string())]);

    let known = compute_identifier("alice", "te", "http://test.example.com", &servers);
    assert_eq!(known.as_str(), "te_tx_alice");

    let unknown = compute_identifier("alice", "te", "http://other", &servers);
    assert_eq!(unknown.as_str(), "te_http://other_alice");

    // purity: identical inputs produce identical output
    assert_eq!(compute_identifier("alice", "te", "http://test.example.com", &servers), known);

    // distinct package or server with the same tag table changes the identifier
    let other_package = compute_identifier("alice", "other", "http://test.example.com", &servers);
    assert_ne!(other_package, known);
}

// --- S3: shared fan-out ---------------------------------------------------

#[tokio::test]
async fn s3_shared_fan_out_and_sentinel_rewrite() {
    let pkg = package("te", &[], &["moda", "modb"]);
    let mut config = InMemoryConfig::new("alice", "pw", "te", "http://example.test", "ignored");
    config.set("moda", "x", "$K");
    config.set("modb", "y", "^K");

    let runtime = Runtime::new();
    runtime.register_package(pkg);
    let observer = Arc::new(FakeObserver::new());
    let agent = Agent::init(
        config,
        FakeHttpSession::new(),
        Arc::new(FakeScriptEngine::new()),
        observer.clone(),
        Arc::new(AlwaysGood),
        &runtime,
    )
    .await
    .unwrap();

    observer.updates(); // init-time noise (wait_time_factor replay etc.) is irrelevant here
    agent.execute("shared_set_K", "42");

    let updates = observer.updates();
    let positions: Vec<&str> = updates.iter().map(|(_, k, _)| k.as_str()).collect();
    let shared_pos = positions.iter().position(|k| *k == "shared_K").unwrap();
    let a_pos = positions.iter().position(|k| *k == "moda_x").unwrap();
    let b_pos = positions.iter().position(|k| *k == "modb_y").unwrap();
    assert!(shared_pos < a_pos && shared_pos < b_pos);
    assert_eq!(updates[shared_pos].2, "42");
    assert_eq!(updates[a_pos].2, "42");
    assert_eq!(updates[b_pos].2, "42");

    agent.execute("modb_set_y", "43");
    let updates = observer.updates();
    assert!(updates.iter().any(|(_, k, v)| k == "shared_K" && v == "43"));
    assert!(updates.iter().any(|(_, k, v)| k == "moda_x" && v == "43"));
}

// --- S4: wait time factor --------------------------------------------------

#[test]
fn s4_random_sequence_matches_the_lcg_and_scales_with_wait_time_factor() {
    let mut sequence = SeededSequence::new();
    let factor = WaitTimeFactor::default();
    let first = random(&mut sequence, 10.0, 20.0, factor);
    assert!((10.0..=20.0).contains(&first));

    // reproduce the same sequence independently from the documented LCG constants
    let modulus = 32768.0;
    let multiplier = 31.0;
    let expected_seed = (INITIAL_SEED as f64 * multiplier) % modulus;
    let expected_unit = expected_seed / modulus;
    let expected = 10.0 + (expected_unit * 10.0).round();
    assert_eq!(first, expected);

    let tripled = WaitTimeFactor::parse("3.0").unwrap();
    let mut sequence = SeededSequence::new();
    let scaled = random(&mut sequence, 10.0, 20.0, tripled);
    assert!(scaled >= 10.0 && scaled <= 10.0 + (10.0 * 3.0));
}

#[test]
fn wait_time_factor_outside_zero_to_infinity_is_rejected() {
    assert!(WaitTimeFactor::parse("0").is_none());
    assert!(WaitTimeFactor::parse("-1").is_none());
    assert!(WaitTimeFactor::parse("NaN").is_none());
    assert!(WaitTimeFactor::parse("inf").is_none());
    assert!(WaitTimeFactor::parse("2.5").is_some());
}

// --- S5: login retries -----------------------------------------------------

struct SequencedLoginEngine {
    inner: FakeScriptEngine,
    logins: parking_lot::Mutex<std::collections::VecDeque<LoginOutcome>>,
}

impl SequencedLoginEngine {
    fn new(logins: Vec<LoginOutcome>) -> Self {
        Self {
            inner: FakeScriptEngine::new(),
            logins: parking_lot::Mutex::new(logins.into()),
        }
    }
}

#[async_trait]
impl ScriptEngine for SequencedLoginEngine {
    async fn call_login(&self, _username: &str, _password: &str) -> LoginOutcome {
        self.logins.lock().pop_front().unwrap_or(LoginOutcome::Success)
    }

    async fn call_run(&self, module: &str) -> hive_script::Suspend<RunOutcome> {
        self.inner.call_run(module).await
    }

    async fn deliver_status(&self, module: &str, settings: &HashMap<String, String>) {
        self.inner.deliver_status(module, settings).await;
    }
}

#[tokio::test]
async fn s5_login_retries_three_times_and_rotates_proxy_twice() {
    let pkg = package("te", &[], &[]);
    let runtime = Runtime::new();
    runtime.register_package(pkg);
    let config = InMemoryConfig::new("alice", "pw", "te", "http://example.test", "ignored");
    let session = FakeHttpSession::new();
    let engine = Arc::new(SequencedLoginEngine::new(vec![
        LoginOutcome::Error("first try throws".to_string()),
        LoginOutcome::Error("second try throws".to_string()),
        LoginOutcome::Success,
    ]));
    let observer = Arc::new(FakeObserver::new());

    let agent = Agent::init(config, session.clone(), engine, observer, Arc::new(AlwaysGood), &runtime)
        .await
        .expect("third attempt succeeds");

    let logs = agent.log_lines();
    let first = logs.iter().position(|l| l.contains("login: 1. try")).unwrap();
    let second = logs.iter().position(|l| l.contains("login: 2. try")).unwrap();
    let third = logs.iter().position(|l| l.contains("login: 3. try")).unwrap();
    assert!(first < second && second < third);

    let rotations = session.calls().iter().filter(|c| matches!(c, HttpCall::ChangeProxy { .. })).count();
    assert_eq!(rotations, 2);
}

// --- S6: module stop during wait --------------------------------------------

#[tokio::test(start_paused = true)]
async fn s6_stopping_a_waiting_module_cancels_the_timer_exactly_once() {
    let pkg = package("te", &[], &["autofarm"]);
    let runtime = Runtime::new();
    runtime.register_package(pkg);
    let config = InMemoryConfig::new("alice", "pw", "te", "http://example.test", "ignored");
    let engine = Arc::new(FakeScriptEngine::new());
    engine.set_default_run_outcome(RunOutcome::Finished(RunWaitHint::Fixed(3600.0)));
    let observer = Arc::new(FakeObserver::new());

    let agent = Agent::init(config, FakeHttpSession::new(), engine.clone(), observer.clone(), Arc::new(AlwaysGood), &runtime)
        .await
        .unwrap();

    agent.execute("autofarm_set_active", "1");
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(agent.module_state("autofarm").await, Some(ModuleState::Wait));

    agent.execute("autofarm_set_active", "0");
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(agent.module_state("autofarm").await, Some(ModuleState::Off));

    let active_zero_count = observer
        .updates()
        .into_iter()
        .filter(|(_, k, v)| k == "autofarm_active" && v == "0")
        .count();
    assert_eq!(active_zero_count, 1);

    let runs_before = engine.calls().iter().filter(|c| matches!(c, ScriptCall::Run { .. })).count();
    tokio::time::sleep(Duration::from_secs(4000)).await;
    let runs_after = engine.calls().iter().filter(|c| matches!(c, ScriptCall::Run { .. })).count();
    assert_eq!(runs_before, runs_after, "no further run_<name> invocations after stop");
}

// --- Remaining universal properties -----------------------------------------

#[test]
fn log_buffer_drops_the_oldest_entry_on_overflow() {
    let mut buffer = LogBuffer::new();
    for i in 0..(LOG_BUFFER_CAPACITY + 5) {
        buffer.push(format!("line {i}"));
    }
    assert_eq!(buffer.len(), LOG_BUFFER_CAPACITY);
    assert_eq!(buffer.iter().next().unwrap(), "line 5");
    assert_eq!(buffer.iter().last().unwrap(), &format!("line {}", LOG_BUFFER_CAPACITY + 4));
}

#[tokio::test]
async fn unknown_package_is_reported_synchronously_from_init() {
    let runtime: Runtime<InMemoryConfig, FakeHttpSession, FakeScriptEngine> = Runtime::new();
    let config = InMemoryConfig::new("alice", "pw", "nonexistent", "http://example.test", "ignored");

    let result = Agent::init(
        config,
        FakeHttpSession::new(),
        Arc::new(FakeScriptEngine::new()),
        Arc::new(FakeObserver::new()),
        Arc::new(AlwaysGood),
        &runtime,
    )
    .await;

    assert!(matches!(result, Err(EngineError::UnknownPackage(name)) if name == "nonexistent"));
}

#[tokio::test]
async fn repeating_the_same_set_command_publishes_only_once() {
    let pkg = package("te", &[], &["moda"]);
    let runtime = Runtime::new();
    runtime.register_package(pkg);
    let config = InMemoryConfig::new("alice", "pw", "te", "http://example.test", "ignored");
    let observer = Arc::new(FakeObserver::new());
    let agent = Agent::init(
        config,
        FakeHttpSession::new(),
        Arc::new(FakeScriptEngine::new()),
        observer.clone(),
        Arc::new(AlwaysGood),
        &runtime,
    )
    .await
    .unwrap();

    observer.updates();
    agent.execute("moda_set_x", "same");
    agent.execute("moda_set_x", "same");

    assert_eq!(agent.status("moda_x"), "same");
    let publishes = observer.updates().into_iter().filter(|(_, k, _)| k == "moda_x").count();
    assert_eq!(publishes, 1, "the second identical write is a no-op and must not republish");
}
