// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real `HttpSession` impl: pooled TLS connections, cookie jar, redirect
//! following, gzip decode, and proxy rotation.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use parking_lot::Mutex;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};
use url::Url;

use crate::connection::{self, Method, RawResponse, RequestLine};
use crate::error::HttpError;

use super::{ConnectionPool, HttpSession, Response, MAX_REDIRECTS, REQUEST_TIMEOUT, USER_AGENT_PROFILES};

fn build_tls_config() -> Arc<ClientConfig> {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for cert in native.certs {
        let _ = roots.add(cert);
    }
    if roots.is_empty() {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Arc::new(config)
}

struct SessionState {
    base_host: String,
    base_port: u16,
    pool: ConnectionPool,
    cookies: Mutex<HashMap<String, String>>,
    proxy: Mutex<Option<String>>,
    connector: TlsConnector,
}

/// A real, TLS-backed session pinned to one base server.
#[derive(Clone)]
pub struct TcpHttpSession {
    state: Arc<SessionState>,
}

impl TcpHttpSession {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let url = Url::parse(base_url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl(base_url.to_string()))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(443);

        Ok(Self {
            state: Arc::new(SessionState {
                base_host: host,
                base_port: port,
                pool: ConnectionPool::new(),
                cookies: Mutex::new(HashMap::new()),
                proxy: Mutex::new(None),
                connector: TlsConnector::from(build_tls_config()),
            }),
        })
    }

    /// Randomly selected per request from `USER_AGENT_PROFILES`.
    fn user_agent(&self) -> &'static str {
        use rand::Rng;
        let i = rand::rng().random_range(0..USER_AGENT_PROFILES.len());
        USER_AGENT_PROFILES[i]
    }

    async fn connect(&self, host: &str, port: u16) -> Result<TlsStream<TcpStream>, HttpError> {
        let proxy = self.state.proxy.lock().clone();
        let tcp = match proxy {
            Some(proxy_addr) => self.connect_via_proxy(&proxy_addr, host, port).await?,
            None => TcpStream::connect((host, port))
                .await
                .map_err(|e| HttpError::Connect(e.to_string()))?,
        };

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| HttpError::InvalidUrl(host.to_string()))?;
        self.state
            .connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| HttpError::Tls(e.to_string()))
    }

    async fn connect_via_proxy(&self, proxy_addr: &str, host: &str, port: u16) -> Result<TcpStream, HttpError> {
        let mut stream = TcpStream::connect(proxy_addr)
            .await
            .map_err(|e| HttpError::Connect(e.to_string()))?;
        let connect_req = format!("CONNECT {host}:{port} HTTP/1.1\r\nHost: {host}:{port}\r\n\r\n");
        stream.write_all(connect_req.as_bytes()).await?;
        stream.flush().await?;
        let resp = connection::read_response(&mut stream).await?;
        if resp.status != 200 {
            return Err(HttpError::Connect(format!("proxy refused CONNECT: {}", resp.status)));
        }
        Ok(stream)
    }

    async fn send_one(
        &self,
        method: Method,
        url: &Url,
        form: Option<&[(String, String)]>,
    ) -> Result<(RawResponse, Url), HttpError> {
        let host = url.host_str().ok_or_else(|| HttpError::InvalidUrl(url.to_string()))?.to_string();
        let port = url.port_or_known_default().unwrap_or(443);
        let path = if url.query().is_some() {
            format!("{}?{}", url.path(), url.query().unwrap_or_default())
        } else {
            url.path().to_string()
        };

        let mut headers = vec![
            ("User-Agent".to_string(), self.user_agent().to_string()),
            ("Accept".to_string(), "*/*".to_string()),
            ("Accept-Encoding".to_string(), "gzip,deflate".to_string()),
            ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
            ("Cache-Control".to_string(), "max-age=0".to_string()),
        ];
        {
            let cookies = self.state.cookies.lock();
            if !cookies.is_empty() {
                let joined = cookies
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                headers.push(("Cookie".to_string(), joined));
            }
        }

        let body = form.map(|pairs| {
            let encoded = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
                .collect::<Vec<_>>()
                .join("&");
            if method == Method::Post {
                headers.push(("Content-Type".to_string(), "application/x-www-form-urlencoded".to_string()));
            }
            encoded.into_bytes()
        });

        let request = RequestLine {
            method,
            path: &path,
            host: &host,
            headers: &headers,
            body: body.as_deref(),
        };

        let pooled = self.state.pool.acquire(&host, port);
        let mut stream = match pooled {
            Some(s) => s,
            None => self.connect(&host, port).await?,
        };

        let outcome = tokio::time::timeout(REQUEST_TIMEOUT, async {
            connection::write_request(&mut stream, &request).await?;
            connection::read_response(&mut stream).await
        })
        .await;

        let raw = match outcome {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                self.state.pool.evict(&host, port);
                return Err(e);
            }
            Err(_) => {
                self.state.pool.evict(&host, port);
                return Err(HttpError::Timeout(REQUEST_TIMEOUT));
            }
        };

        self.absorb_set_cookie(&raw);

        let keep_alive = !raw
            .header("connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("close"));
        if keep_alive {
            self.state.pool.release(&host, port, stream);
        }

        Ok((raw, url.clone()))
    }

    fn absorb_set_cookie(&self, raw: &RawResponse) {
        let mut cookies = self.state.cookies.lock();
        for (name, value) in &raw.headers {
            if !name.eq_ignore_ascii_case("set-cookie") {
                continue;
            }
            let kv = value.split(';').next().unwrap_or(value);
            if let Some((k, v)) = kv.split_once('=') {
                cookies.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
    }

    async fn fetch(&self, url: Url, method: Method, form: Option<&[(String, String)]>) -> Result<Response, HttpError> {
        let mut current_url = url;
        let mut current_method = method;
        let mut current_form = form;
        let mut hops = 0u8;

        loop {
            let (raw, used_url) = self.send_one(current_method, &current_url, current_form).await?;

            if matches!(raw.status, 301 | 302 | 303 | 307 | 308) {
                if hops >= MAX_REDIRECTS {
                    return Err(HttpError::TooManyRedirects(hops));
                }
                let location = raw.header("location").ok_or(HttpError::MissingRedirectLocation)?;
                let next = used_url
                    .join(location)
                    .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
                debug!(from = %used_url, to = %next, "following redirect");
                current_url = next;
                current_method = Method::Get;
                current_form = None;
                hops += 1;
                continue;
            }

            let body_bytes = decode_body(&raw)?;
            let body_text = String::from_utf8_lossy(&body_bytes).into_owned();
            let tidied = super::tidy::tidy(&body_text, used_url.as_str());

            return Ok(Response {
                status: raw.status,
                headers: raw.headers,
                body: tidied,
                final_url: used_url.to_string(),
            });
        }
    }

    fn resolve(&self, path_or_url: &str) -> Result<Url, HttpError> {
        if let Ok(absolute) = Url::parse(path_or_url) {
            return Ok(absolute);
        }
        let base = format!("https://{}:{}", self.state.base_host, self.state.base_port);
        Url::parse(&base)
            .and_then(|b| b.join(path_or_url))
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }
}

fn decode_body(raw: &RawResponse) -> Result<Vec<u8>, HttpError> {
    let is_gzip = raw
        .header("content-encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("gzip"));
    if !is_gzip {
        return Ok(raw.body.clone());
    }
    let mut decoder = GzDecoder::new(raw.body.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|_| HttpError::GzipFailure)?;
    Ok(out)
}

fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[async_trait]
impl HttpSession for TcpHttpSession {
    async fn get(&self, url: &str) -> Result<Response, HttpError> {
        let target = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        self.fetch(target, Method::Get, None).await
    }

    async fn get_path(&self, path: &str) -> Result<Response, HttpError> {
        let target = self.resolve(path)?;
        self.fetch(target, Method::Get, None).await
    }

    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<Response, HttpError> {
        let target = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        self.fetch(target, Method::Post, Some(form)).await
    }

    async fn post_path(&self, path: &str, form: &[(String, String)]) -> Result<Response, HttpError> {
        let target = self.resolve(path)?;
        self.fetch(target, Method::Post, Some(form)).await
    }

    async fn change_proxy(&self, proxy: Option<String>) {
        warn!(?proxy, "rotating outbound proxy");
        *self.state.proxy.lock() = proxy;
    }

    fn cookies(&self) -> HashMap<String, String> {
        self.state.cookies.lock().clone()
    }

    fn set_cookies(&self, cookies: HashMap<String, String>) {
        *self.state.cookies.lock() = cookies;
    }
}
