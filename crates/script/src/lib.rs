// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hive-script: the script host and capability bridge.
//!
//! A real embedded interpreter is out of scope — [`ScriptEngine`] is the
//! seam callers plug their own in at. This crate owns everything around
//! it: the capability surface a running script sees (HTTP, HTML/regex
//! scraping, form submission, logging, status mutation) and the
//! cooperative-suspension protocol that lets a single-threaded script
//! invocation await a host operation without blocking a thread.

mod capabilities;
mod engine;
mod error;
mod form;
mod regex_util;
mod suspend;
mod xpath;

pub use capabilities::{CapabilityHost, Capabilities};
pub use engine::{RunOutcome, ScriptEngine};
pub use error::CapabilityError;
pub use form::FormSubmission;
pub use suspend::{BoxFuture, Suspend};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeScriptEngine, ScriptCall};
