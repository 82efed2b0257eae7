// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable fake `HttpSession` for `hive-script`/`hive-engine` tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::HttpError;

use super::{HttpSession, Response};

/// One recorded call, in call order.
#[derive(Debug, Clone)]
pub enum HttpCall {
    Get { url: String },
    GetPath { path: String },
    Post { url: String, form: Vec<(String, String)> },
    PostPath { path: String, form: Vec<(String, String)> },
    ChangeProxy { proxy: Option<String> },
}

struct FakeState {
    calls: Vec<HttpCall>,
    responses: HashMap<String, Result<Response, String>>,
    default_response: Option<Response>,
    cookies: HashMap<String, String>,
}

/// Fake `HttpSession`: responses are scripted per-URL via
/// [`FakeHttpSession::script`], falling back to
/// [`FakeHttpSession::set_default`] when no script matches.
#[derive(Clone)]
pub struct FakeHttpSession {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeHttpSession {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                responses: HashMap::new(),
                default_response: None,
                cookies: HashMap::new(),
            })),
        }
    }
}

impl FakeHttpSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.inner.lock().calls.clone()
    }

    pub fn script(&self, url: impl Into<String>, response: Response) {
        self.inner.lock().responses.insert(url.into(), Ok(response));
    }

    pub fn script_error(&self, url: impl Into<String>, message: impl Into<String>) {
        self.inner.lock().responses.insert(url.into(), Err(message.into()));
    }

    pub fn set_default(&self, response: Response) {
        self.inner.lock().default_response = Some(response);
    }

    fn resolve(&self, key: &str) -> Result<Response, HttpError> {
        let inner = self.inner.lock();
        if let Some(scripted) = inner.responses.get(key) {
            return scripted
                .clone()
                .map_err(HttpError::Connect);
        }
        inner
            .default_response
            .clone()
            .ok_or_else(|| HttpError::Connect(format!("no scripted response for {key}")))
    }
}

#[async_trait]
impl HttpSession for FakeHttpSession {
    async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.inner.lock().calls.push(HttpCall::Get { url: url.to_string() });
        self.resolve(url)
    }

    async fn get_path(&self, path: &str) -> Result<Response, HttpError> {
        self.inner.lock().calls.push(HttpCall::GetPath { path: path.to_string() });
        self.resolve(path)
    }

    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<Response, HttpError> {
        self.inner.lock().calls.push(HttpCall::Post {
            url: url.to_string(),
            form: form.to_vec(),
        });
        self.resolve(url)
    }

    async fn post_path(&self, path: &str, form: &[(String, String)]) -> Result<Response, HttpError> {
        self.inner.lock().calls.push(HttpCall::PostPath {
            path: path.to_string(),
            form: form.to_vec(),
        });
        self.resolve(path)
    }

    async fn change_proxy(&self, proxy: Option<String>) {
        self.inner.lock().calls.push(HttpCall::ChangeProxy { proxy });
    }

    fn cookies(&self) -> HashMap<String, String> {
        self.inner.lock().cookies.clone()
    }

    fn set_cookies(&self, cookies: HashMap<String, String>) {
        self.inner.lock().cookies = cookies;
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
