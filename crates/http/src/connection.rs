// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `http_connection`: the per-request wire state machine.
//!
//! One call drives a connection through `WRITE_REQ -> READ_UNTIL("\r\n\r\n")
//! -> header parse -> body`, where the body is read according to
//! `Content-Length`, chunked transfer-encoding, or connection-close,
//! whichever the response headers declare.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::HttpError;

/// Headers larger than this abort the read rather than buffer unbounded
/// attacker-controlled data (the body itself is left memory-bounded only,
/// with no fixed cap on `Content-Length`).
const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A request ready to be serialized onto the wire.
pub struct RequestLine<'a> {
    pub method: Method,
    pub path: &'a str,
    pub host: &'a str,
    pub headers: &'a [(String, String)],
    pub body: Option<&'a [u8]>,
}

/// Serialize `req` as an HTTP/1.1 request, including a `Host` header,
/// `Content-Length` when there is a body, and `Connection: keep-alive`.
pub fn build_request(req: &RequestLine<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("{} {} HTTP/1.1\r\n", req.method.as_str(), req.path).as_bytes());
    out.extend_from_slice(format!("Host: {}\r\n", req.host).as_bytes());
    out.extend_from_slice(b"Connection: keep-alive\r\n");
    for (name, value) in req.headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    if let Some(body) = req.body {
        out.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    if let Some(body) = req.body {
        out.extend_from_slice(body);
    }
    out
}

pub async fn write_request<W: AsyncWrite + Unpin>(
    stream: &mut W,
    req: &RequestLine<'_>,
) -> Result<(), HttpError> {
    stream.write_all(&build_request(req)).await?;
    stream.flush().await?;
    Ok(())
}

/// A parsed, fully-read response: status line, headers, and decoded body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    ContentLength(usize),
    Chunked,
    UntilClose,
}

fn body_mode(headers: &[(String, String)]) -> BodyMode {
    let transfer_encoding = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("transfer-encoding"))
        .map(|(_, v)| v.to_ascii_lowercase());
    if transfer_encoding.as_deref().is_some_and(|v| v.contains("chunked")) {
        return BodyMode::Chunked;
    }
    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok());
    match content_length {
        Some(len) => BodyMode::ContentLength(len),
        None => BodyMode::UntilClose,
    }
}

/// Read and parse one full response off `stream`: status line, headers,
/// and body, picking the body strategy from the response headers.
pub async fn read_response<S: AsyncRead + Unpin>(stream: &mut S) -> Result<RawResponse, HttpError> {
    let header_bytes = read_until_header_terminator(stream).await?;
    let header_text = String::from_utf8_lossy(&header_bytes);
    let mut lines = header_text.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let status = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::MalformedHeader(line.to_string()))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let body = match body_mode(&headers) {
        BodyMode::ContentLength(len) => read_exact_body(stream, len).await?,
        BodyMode::Chunked => read_chunked_body(stream).await?,
        BodyMode::UntilClose => read_until_close(stream).await?,
    };

    Ok(RawResponse { status, headers, body })
}

fn parse_status_line(line: &str) -> Result<u16, HttpError> {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let code = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| HttpError::MalformedStatusLine(line.to_string()))?;
    Ok(code)
}

async fn read_until_header_terminator<S: AsyncRead + Unpin>(
    stream: &mut S,
) -> Result<Vec<u8>, HttpError> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            return Err(HttpError::MalformedStatusLine("connection closed before headers".into()));
        }
        buf.push(byte[0]);
        if buf.len() > MAX_HEADER_BYTES {
            return Err(HttpError::HeadersTooLarge);
        }
        if buf.ends_with(b"\r\n\r\n") {
            buf.truncate(buf.len() - 4);
            return Ok(buf);
        }
    }
}

async fn read_exact_body<S: AsyncRead + Unpin>(stream: &mut S, len: usize) -> Result<Vec<u8>, HttpError> {
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await?;
    Ok(buf)
}

async fn read_chunked_body<S: AsyncRead + Unpin>(stream: &mut S) -> Result<Vec<u8>, HttpError> {
    let mut out = Vec::new();
    loop {
        let size_line = read_line(stream).await?;
        let size = usize::from_str_radix(size_line.trim(), 16)
            .map_err(|_| HttpError::MalformedChunk)?;
        if size == 0 {
            // consume the trailing CRLF after the terminating 0-size chunk
            let _ = read_line(stream).await?;
            return Ok(out);
        }
        let mut chunk = vec![0u8; size];
        stream.read_exact(&mut chunk).await?;
        out.extend_from_slice(&chunk);
        let trailer = read_line(stream).await?;
        if !trailer.is_empty() {
            return Err(HttpError::MalformedChunk);
        }
    }
}

async fn read_until_close<S: AsyncRead + Unpin>(stream: &mut S) -> Result<Vec<u8>, HttpError> {
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await?;
    Ok(out)
}

async fn read_line<S: AsyncRead + Unpin>(stream: &mut S) -> Result<String, HttpError> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            return Err(HttpError::MalformedChunk);
        }
        if byte[0] == b'\n' {
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            return Ok(String::from_utf8_lossy(&buf).into_owned());
        }
        buf.push(byte[0]);
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
