// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn page(body: &str) -> Response {
    Response {
        status: 200,
        headers: Vec::new(),
        body: body.to_string(),
        final_url: "https://example.com".to_string(),
    }
}

#[tokio::test]
async fn records_calls_in_order() {
    let session = FakeHttpSession::new();
    session.set_default(page("hi"));

    session.get("https://example.com/a").await.expect("scripted");
    session.change_proxy(Some("10.0.0.1:8080".to_string())).await;

    let calls = session.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], HttpCall::Get { url } if url == "https://example.com/a"));
    assert!(matches!(&calls[1], HttpCall::ChangeProxy { proxy: Some(p) } if p == "10.0.0.1:8080"));
}

#[tokio::test]
async fn scripted_response_overrides_default() {
    let session = FakeHttpSession::new();
    session.set_default(page("default"));
    session.script("https://example.com/special", page("special"));

    let resp = session.get("https://example.com/special").await.expect("scripted");
    assert_eq!(resp.body, "special");
}

#[tokio::test]
async fn missing_script_without_default_is_an_error() {
    let session = FakeHttpSession::new();
    let err = session.get("https://example.com/missing").await.unwrap_err();
    assert!(matches!(err, HttpError::Connect(_)));
}
