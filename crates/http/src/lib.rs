// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-http: `http_connection` + `http_session` + `proxy_checker`.

pub mod connection;
pub mod error;
pub mod proxy_checker;
pub mod session;

pub use error::HttpError;
pub use proxy_checker::{verify_proxies, VERIFY_DEADLINE};
pub use session::{
    ConnectionPool, HttpProxyPredicate, HttpSession, Response, TcpHttpSession, MAX_REDIRECTS,
    REQUEST_TIMEOUT, USER_AGENT_PROFILES,
};

#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeHttpSession, HttpCall};
