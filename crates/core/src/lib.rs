// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-core: domain types shared by the bot-runtime crates.

pub mod agent;
pub mod error;
pub mod id;
pub mod log;
pub mod module;
pub mod package;
pub mod status;
pub mod wait;

pub use agent::{AgentLifecycle, LoginOutcome, MAX_LOGIN_ATTEMPTS};
pub use error::CoreError;
pub use id::{compute_identifier, AgentId};
pub use log::{format_log_line, LogBuffer, LogLevel, LOG_BUFFER_CAPACITY};
pub use module::{ModuleRecord, ModuleState, RunWaitHint, ACTIVE_KEY, DEFAULT_WAIT_MAX, DEFAULT_WAIT_MIN};
pub use package::{Package, BASE_MODULE, SERVERS_MODULE};
pub use status::{
    dependent_variables, module_key, parse_sentinel, resolve_read_through, shared_key,
    split_scoped_key, ModuleSettings, Sentinel, SentinelMode, BASE_NAMESPACE, SHARED_NAMESPACE,
};
pub use wait::{random, SeededSequence, WaitTimeFactor, INITIAL_SEED};
