// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package assembly errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to read package directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("package is missing required module: {0}")]
    MissingModule(&'static str),
    #[error("servers script evaluation failed: {0}")]
    ServersEvaluation(String),
    #[error("interface script evaluation failed for module {module}: {source}")]
    InterfaceEvaluation { module: String, source: String },
}
