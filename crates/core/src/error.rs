// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared validation error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid wait time factor: {0}")]
    InvalidWaitTimeFactor(String),
    #[error("status key {0:?} has no namespace token")]
    MalformedStatusKey(String),
}
