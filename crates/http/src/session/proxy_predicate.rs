// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete proxy-verification probe: `GET /` against a base server
//! through a candidate proxy, checked with a caller-supplied content
//! predicate. `proxy_checker` itself is predicate-agnostic — this is
//! the production probe that actually issues the request.

use crate::error::HttpError;
use crate::session::HttpSession;

/// Verifies one proxy by fetching `/` from a fresh session through it
/// and handing the response body to `content_ok`. A new session is
/// built per check via `session_factory` so concurrent checks (run in
/// parallel by `proxy_checker::verify_proxies`) never share one
/// session's single active-proxy slot.
pub struct HttpProxyPredicate<Factory, S, F> {
    session_factory: Factory,
    content_ok: F,
    _session: std::marker::PhantomData<S>,
}

impl<Factory, S, F> HttpProxyPredicate<Factory, S, F>
where
    Factory: Fn() -> Result<S, HttpError> + Send + Sync + 'static,
    S: HttpSession,
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    pub fn new(session_factory: Factory, content_ok: F) -> Self {
        Self { session_factory, content_ok, _session: std::marker::PhantomData }
    }

    /// Run the probe for one candidate `host:port` proxy.
    pub async fn check(&self, proxy: String) -> bool {
        let Ok(session) = (self.session_factory)() else {
            return false;
        };
        session.change_proxy(Some(proxy)).await;
        match session.get_path("/").await {
            Ok(response) => (self.content_ok)(&response.body),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "proxy_predicate_tests.rs"]
mod tests;
