// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability-call error taxonomy. Codes are stable
//! integers because scripts test against them directly.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("invalid xpath: {0:?}")]
    InvalidXpath(String),
    #[error("no form or submit element found")]
    NoFormOrSubmit,
    #[error("submit node is not inside a form")]
    SubmitNotInForm,
    #[error("caller parameter not present in form: {0:?}")]
    ParamMismatch(String),
    #[error("gzip decode failure")]
    GzipFailure,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("agent identifier not registered: {0:?}")]
    UnknownAgent(String),
    #[error("invalid regex: {0}")]
    InvalidRegex(String),
}

impl CapabilityError {
    /// Stable integer code exposed to scripts.
    pub fn code(&self) -> u32 {
        match self {
            CapabilityError::InvalidXpath(_) => 201,
            CapabilityError::NoFormOrSubmit => 202,
            CapabilityError::SubmitNotInForm => 203,
            CapabilityError::ParamMismatch(_) => 204,
            CapabilityError::GzipFailure => 205,
            CapabilityError::Transport(_) => 0,
            CapabilityError::UnknownAgent(_) => 0,
            CapabilityError::InvalidRegex(_) => 0,
        }
    }
}

impl From<hive_http::HttpError> for CapabilityError {
    fn from(err: hive_http::HttpError) -> Self {
        if matches!(err, hive_http::HttpError::GzipFailure) {
            CapabilityError::GzipFailure
        } else {
            CapabilityError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
