// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced while loading or validating a `Config`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("flat key {0:?} has no namespace token")]
    MalformedKey(String),
    #[error("config is missing a required field: {0}")]
    MissingField(&'static str),
}
