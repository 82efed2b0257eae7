// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::session::{FakeHttpSession, HttpCall, Response};

fn response(body: &str) -> Response {
    Response {
        status: 200,
        headers: Vec::new(),
        body: body.to_string(),
        final_url: "https://example.test/".to_string(),
    }
}

#[tokio::test]
async fn issues_get_path_through_the_given_proxy_and_accepts_a_matching_body() {
    let session = FakeHttpSession::new();
    session.set_default(response("logged in as someone"));
    let session_for_factory = session.clone();
    let predicate = HttpProxyPredicate::new(
        move || Ok(session_for_factory.clone()),
        |body: &str| body.contains("logged in"),
    );

    assert!(predicate.check("proxy1:8080".to_string()).await);

    let calls = session.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, HttpCall::ChangeProxy { proxy: Some(p) } if p == "proxy1:8080")));
    assert!(matches!(calls.last(), Some(HttpCall::GetPath { path }) if path == "/"));
}

#[tokio::test]
async fn a_body_the_predicate_rejects_fails_the_check() {
    let session = FakeHttpSession::new();
    session.set_default(response("access denied"));
    let session_for_factory = session.clone();
    let predicate = HttpProxyPredicate::new(
        move || Ok(session_for_factory.clone()),
        |body: &str| body.contains("logged in"),
    );

    assert!(!predicate.check("proxy1:8080".to_string()).await);
}

#[tokio::test]
async fn a_failed_request_is_treated_as_a_bad_proxy() {
    let session = FakeHttpSession::new();
    let session_for_factory = session.clone();
    let predicate = HttpProxyPredicate::new(move || Ok(session_for_factory.clone()), |_: &str| true);

    assert!(!predicate.check("proxy1:8080".to_string()).await);
}
