// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-controller error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config is not valid: username/password/package/server required")]
    InvalidConfig,
    #[error("unknown package: {0:?}")]
    UnknownPackage(String),
    #[error("an agent is already registered under identifier {0:?}")]
    DuplicateIdentifier(String),
    #[error("no agent registered under identifier {0:?}")]
    UnknownAgent(String),
    #[error("proxy verification failed: {0}")]
    ProxyVerification(String),
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<hive_http::HttpError> for EngineError {
    fn from(err: hive_http::HttpError) -> Self {
        EngineError::Transport(err.to_string())
    }
}

impl From<EngineError> for hive_script::CapabilityError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownAgent(id) => hive_script::CapabilityError::UnknownAgent(id),
            other => hive_script::CapabilityError::Transport(other.to_string()),
        }
    }
}
