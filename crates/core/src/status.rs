// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flat status key/value space and sentinel read/write-through rules.
//!
//! Keys in the agent status table are `<module>_<name>`; `base` and
//! `shared` are reserved module tokens.

use std::collections::HashMap;

pub const BASE_NAMESPACE: &str = "base";
pub const SHARED_NAMESPACE: &str = "shared";

/// Split a flat key into its leading namespace token and the remainder.
///
/// The leading token is the substring before the first `_`: the first
/// underscore-delimited token is always either `base`, `shared`, or a
/// module name.
pub fn split_scoped_key(key: &str) -> Option<(&str, &str)> {
    let idx = key.find('_')?;
    Some((&key[..idx], &key[idx + 1..]))
}

/// A setting's sentinel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelMode {
    /// Plain value, no indirection.
    None,
    /// `$name` — read-through only.
    Read,
    /// `^name` — read-through, and writes rewrite to `shared_name`.
    ReadWrite,
}

/// A setting's raw value parsed for sentinel indirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel<'a> {
    pub mode: SentinelMode,
    /// The referenced shared variable name, if `mode != None`.
    pub shared_name: Option<&'a str>,
}

/// Parse a raw setting value for `$name`/`^name` sentinel indirection.
pub fn parse_sentinel(raw: &str) -> Sentinel<'_> {
    if let Some(name) = raw.strip_prefix('^') {
        Sentinel {
            mode: SentinelMode::ReadWrite,
            shared_name: Some(name),
        }
    } else if let Some(name) = raw.strip_prefix('$') {
        Sentinel {
            mode: SentinelMode::Read,
            shared_name: Some(name),
        }
    } else {
        Sentinel {
            mode: SentinelMode::None,
            shared_name: None,
        }
    }
}

/// Resolve a raw setting value for delivery to a script: if it is a
/// sentinel, substitute the current `shared_<name>` value via `lookup`;
/// otherwise return the raw value unchanged.
pub fn resolve_read_through<'a>(
    raw: &'a str,
    lookup: impl FnOnce(&str) -> Option<&'a str>,
) -> &'a str {
    match parse_sentinel(raw).shared_name {
        Some(name) => lookup(name).unwrap_or(""),
        None => raw,
    }
}

/// A single module setting's raw value, addressed by `(module, key)`.
pub type ModuleSettings = HashMap<String, HashMap<String, String>>;

/// Scan `module_settings` for every `(module, key)` whose raw value is
/// exactly `$shared_key` or `^shared_key`, i.e. the dependents of
/// `shared_<shared_key>`.
pub fn dependent_variables<'a>(
    module_settings: &'a ModuleSettings,
    shared_key: &str,
) -> Vec<(&'a str, &'a str)> {
    let dollar = format!("${shared_key}");
    let caret = format!("^{shared_key}");
    let mut out = Vec::new();
    for (module, settings) in module_settings {
        for (key, raw) in settings {
            if raw == &dollar || raw == &caret {
                out.push((module.as_str(), key.as_str()));
            }
        }
    }
    out
}

/// Build the flat `shared_<name>` key.
pub fn shared_key(name: &str) -> String {
    format!("{SHARED_NAMESPACE}_{name}")
}

/// Build the flat `<module>_<key>` key.
pub fn module_key(module: &str, key: &str) -> String {
    format!("{module}_{key}")
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
