// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keep-alive connection pool, keyed by `(host, port)`.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

type PooledStream = TlsStream<TcpStream>;

/// Idle TLS connections, grouped by destination. Bounded implicitly by one
/// entry per in-flight request releasing its stream back when done; never
/// grows past the number of requests issued concurrently.
#[derive(Default)]
pub struct ConnectionPool {
    idle: Mutex<HashMap<(String, u16), VecDeque<PooledStream>>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an idle connection to `(host, port)` if one is available.
    pub fn acquire(&self, host: &str, port: u16) -> Option<PooledStream> {
        self.idle
            .lock()
            .get_mut(&(host.to_string(), port))
            .and_then(VecDeque::pop_front)
    }

    /// Return a still-usable connection to the pool for reuse.
    pub fn release(&self, host: &str, port: u16, stream: PooledStream) {
        self.idle
            .lock()
            .entry((host.to_string(), port))
            .or_default()
            .push_back(stream);
    }

    /// Drop any pooled connections for a destination (e.g. after an I/O
    /// error, so a fresh connection is made next time).
    pub fn evict(&self, host: &str, port: u16) {
        self.idle.lock().remove(&(host.to_string(), port));
    }
}
