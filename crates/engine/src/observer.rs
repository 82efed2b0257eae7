// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-agent update observer. Every status
//! write fires `(identifier, key, value)`; observer panics/errors are
//! swallowed — a misbehaving UI layer
//! must never take an agent down.

use std::panic::AssertUnwindSafe;

use parking_lot::Mutex;

/// Receives one `(identifier, key, value)` notification per status write.
pub trait Observer: Send + Sync + 'static {
    fn on_update(&self, identifier: &str, key: &str, value: &str);
}

/// Call `observer.on_update`, discarding any panic.
pub fn notify(observer: &dyn Observer, identifier: &str, key: &str, value: &str) {
    let _ = std::panic::catch_unwind(AssertUnwindSafe(|| observer.on_update(identifier, key, value)));
}

/// No-op observer for callers that don't need update notifications.
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_update(&self, _identifier: &str, _key: &str, _value: &str) {}
}

/// Recording observer for tests.
#[derive(Default)]
pub struct FakeObserver {
    updates: Mutex<Vec<(String, String, String)>>,
}

impl FakeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(String, String, String)> {
        self.updates.lock().clone()
    }
}

impl Observer for FakeObserver {
    fn on_update(&self, identifier: &str, key: &str, value: &str) {
        self.updates.lock().push((identifier.to_string(), key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
