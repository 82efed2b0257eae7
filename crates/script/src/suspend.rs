// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative suspension.
//!
//! A script never blocks a thread. A capability call that needs an async
//! operation (HTTP, a timer) returns [`Suspend::Pending`]; the host awaits
//! that future to obtain the eventual result and resumes the script at its
//! single continuation point. A call that can answer immediately returns
//! [`Suspend::Ready`].

use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub enum Suspend<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Suspend<T> {
    /// Resolve to the final value, awaiting the continuation if suspended.
    pub async fn resolve(self) -> T {
        match self {
            Suspend::Ready(value) => value,
            Suspend::Pending(fut) => fut.await,
        }
    }

    pub fn ready(value: T) -> Self {
        Suspend::Ready(value)
    }

    pub fn pending(fut: impl Future<Output = T> + Send + 'static) -> Self {
        Suspend::Pending(Box::pin(fut))
    }
}

#[cfg(test)]
#[path = "suspend_tests.rs"]
mod tests;
