// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builds_get_request_with_host_and_keep_alive() {
    let req = RequestLine {
        method: Method::Get,
        path: "/path",
        host: "example.com",
        headers: &[],
        body: None,
    };
    let bytes = String::from_utf8(build_request(&req)).expect("ascii request");
    assert!(bytes.starts_with("GET /path HTTP/1.1\r\n"));
    assert!(bytes.contains("Host: example.com\r\n"));
    assert!(bytes.contains("Connection: keep-alive\r\n"));
    assert!(bytes.ends_with("\r\n\r\n"));
}

#[test]
fn builds_post_request_with_content_length() {
    let headers = vec![("Content-Type".to_string(), "text/plain".to_string())];
    let req = RequestLine {
        method: Method::Post,
        path: "/submit",
        host: "example.com",
        headers: &headers,
        body: Some(b"abc"),
    };
    let bytes = String::from_utf8(build_request(&req)).expect("ascii request");
    assert!(bytes.contains("Content-Length: 3\r\n"));
    assert!(bytes.ends_with("abc"));
}

async fn roundtrip(raw: &[u8]) -> RawResponse {
    let (mut writer, mut reader) = tokio::io::duplex(raw.len() + 16);
    tokio::io::AsyncWriteExt::write_all(&mut writer, raw).await.expect("write");
    drop(writer);
    read_response(&mut reader).await.expect("parses")
}

#[tokio::test]
async fn parses_status_and_content_length_body() {
    let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nX-Foo: bar\r\n\r\nhello";
    let resp = roundtrip(raw).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("x-foo"), Some("bar"));
    assert_eq!(resp.body, b"hello");
}

#[tokio::test]
async fn parses_chunked_body() {
    let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
    let resp = roundtrip(raw).await;
    assert_eq!(resp.body, b"Wikipedia");
}

#[tokio::test]
async fn reads_until_close_when_no_length_given() {
    let raw = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nrest-of-stream";
    let resp = roundtrip(raw).await;
    assert_eq!(resp.body, b"rest-of-stream");
}

#[tokio::test]
async fn rejects_malformed_status_line() {
    let (mut writer, mut reader) = tokio::io::duplex(64);
    tokio::io::AsyncWriteExt::write_all(&mut writer, b"nonsense\r\n\r\n")
        .await
        .expect("write");
    drop(writer);
    let err = read_response(&mut reader).await.unwrap_err();
    assert!(matches!(err, HttpError::MalformedStatusLine(_)));
}
