// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the HTTP stack.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("tls handshake failed: {0}")]
    Tls(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("headers exceeded the maximum size")]
    HeadersTooLarge,
    #[error("malformed chunked transfer-encoding")]
    MalformedChunk,
    #[error("gzip decode failure")]
    GzipFailure,
    #[error("too many redirects ({0})")]
    TooManyRedirects(u8),
    #[error("redirect response had no Location header")]
    MissingRedirectLocation,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
}
