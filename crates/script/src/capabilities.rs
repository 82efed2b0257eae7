// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability bridge dispatched to a script under the HTTP and
//! utility namespaces. Every call is identified by the two
//! host-set globals — agent identifier and current module — so the
//! bridge itself carries no per-call state.

use std::sync::Arc;

use async_trait::async_trait;
use hive_core::LogLevel;
use hive_http::{HttpSession, Response};

use crate::error::CapabilityError;
use crate::form;
use crate::regex_util;
use crate::xpath;

/// Host hooks the bridge needs but must not own: recovering an agent's
/// session by identifier, mutating its status space, and emitting
/// Observer log lines all reach into the agent controller, which lives
/// above this crate in the dependency order.
#[async_trait]
pub trait CapabilityHost: Send + Sync + 'static {
    type Session: HttpSession;

    /// Look up the session for `identifier`. A non-registered identifier
    /// is a capability-call error.
    async fn session(&self, identifier: &str) -> Result<Self::Session, CapabilityError>;

    /// `set_status(key, value)`: equivalent to executing
    /// `<module>_set_<key> = value` via the agent.
    async fn set_status(
        &self,
        identifier: &str,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CapabilityError>;

    /// Append one Observer log line for `identifier`/`module`.
    fn log(&self, identifier: &str, module: &str, level: LogLevel, message: &str);
}

/// The capability surface exposed to one script host, generic over the
/// agent-registry implementation it is wired to.
#[derive(Clone)]
pub struct Capabilities<H> {
    host: Arc<H>,
}

impl<H: CapabilityHost> Capabilities<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    // --- HTTP namespace ---------------------------------------------

    pub async fn get(&self, identifier: &str, url: &str) -> Result<Response, CapabilityError> {
        Ok(self.host.session(identifier).await?.get(url).await?)
    }

    pub async fn get_path(&self, identifier: &str, path: &str) -> Result<Response, CapabilityError> {
        Ok(self.host.session(identifier).await?.get_path(path).await?)
    }

    pub async fn post(
        &self,
        identifier: &str,
        url: &str,
        body: &[(String, String)],
    ) -> Result<Response, CapabilityError> {
        Ok(self.host.session(identifier).await?.post(url, body).await?)
    }

    pub async fn post_path(
        &self,
        identifier: &str,
        path: &str,
        body: &[(String, String)],
    ) -> Result<Response, CapabilityError> {
        Ok(self.host.session(identifier).await?.post_path(path, body).await?)
    }

    pub async fn submit_form(
        &self,
        identifier: &str,
        page: &str,
        xpath: &str,
        params: &[(String, String)],
        action: Option<&str>,
    ) -> Result<Response, CapabilityError> {
        let submission = form::prepare_submission(page, xpath, params, action)?;
        let session = self.host.session(identifier).await?;
        if form::is_absolute(&submission.action) {
            Ok(session.post(&submission.action, &submission.fields).await?)
        } else {
            Ok(session.post_path(&submission.action, &submission.fields).await?)
        }
    }

    // --- Utility namespace -------------------------------------------

    pub fn get_by_xpath(&self, html: &str, xpath_expr: &str) -> Result<String, CapabilityError> {
        xpath::get_by_xpath(html, xpath_expr)
    }

    pub fn get_all_by_xpath(&self, html: &str, xpath_expr: &str) -> Result<Vec<String>, CapabilityError> {
        xpath::get_all_by_xpath(html, xpath_expr)
    }

    pub fn get_by_regex(&self, text: &str, pattern: &str) -> Result<String, CapabilityError> {
        regex_util::get_by_regex(text, pattern)
    }

    pub fn get_all_by_regex(&self, text: &str, pattern: &str) -> Result<Vec<Vec<String>>, CapabilityError> {
        regex_util::get_all_by_regex(text, pattern)
    }

    pub fn log_debug(&self, identifier: &str, module: &str, message: &str) {
        self.host.log(identifier, module, LogLevel::Debug, message);
    }

    pub fn log(&self, identifier: &str, module: &str, message: &str) {
        self.host.log(identifier, module, LogLevel::Info, message);
    }

    pub fn log_error(&self, identifier: &str, module: &str, message: &str) {
        self.host.log(identifier, module, LogLevel::Error, message);
    }

    pub async fn set_status(
        &self,
        identifier: &str,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CapabilityError> {
        self.host.set_status(identifier, module, key, value).await
    }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
