// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `http_session`: pooled HTTPS requests, redirects, cookies, gzip,
//! timeouts.

mod pool;
mod proxy_predicate;
mod tcp;
mod tidy;

pub use pool::ConnectionPool;
pub use proxy_predicate::HttpProxyPredicate;
pub use tcp::TcpHttpSession;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHttpSession, HttpCall};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::HttpError;

/// Per-request deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Redirects are followed at most this many hops, always re-issued as GET.
pub const MAX_REDIRECTS: u8 = 3;

/// Two distinct outbound user-agent profiles, randomly selected per request.
pub const USER_AGENT_PROFILES: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
];

/// A fully-fetched, tidied page.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Gzip-decoded, tidy-passed body. Text responses carry the injected
    /// `<meta name="location">` tag; non-HTML bodies pass through untouched.
    pub body: String,
    pub final_url: String,
}

/// A scripted session pinned to one agent: one cookie jar, one base host,
/// one rotating proxy.
#[async_trait]
pub trait HttpSession: Clone + Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<Response, HttpError>;
    /// `get` against the session's base host.
    async fn get_path(&self, path: &str) -> Result<Response, HttpError>;
    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<Response, HttpError>;
    /// `post` against the session's base host.
    async fn post_path(&self, path: &str, form: &[(String, String)]) -> Result<Response, HttpError>;

    /// Rotate the outbound proxy. `None` clears it (direct connection).
    async fn change_proxy(&self, proxy: Option<String>);

    fn cookies(&self) -> HashMap<String, String>;
    fn set_cookies(&self, cookies: HashMap<String, String>);
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
