// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package data model.

use std::collections::HashMap;

/// Reserved module name holding the `login` function; never scheduled.
pub const BASE_MODULE: &str = "base";
/// Reserved module name holding pure servers data.
pub const SERVERS_MODULE: &str = "servers";

/// Immutable script bundle, shared by every agent running it.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    /// Server URL -> short tag.
    pub servers: HashMap<String, String>,
    /// Module name -> opaque script text, including `base` and `servers`.
    pub modules: HashMap<String, String>,
    /// JSON UI schema produced by the interface descriptor.
    pub interface_json: serde_json::Value,
}

impl Package {
    /// Module names excluding the two reserved ones.
    pub fn real_module_names(&self) -> impl Iterator<Item = &str> {
        self.modules
            .keys()
            .map(String::as_str)
            .filter(|name| *name != BASE_MODULE && *name != SERVERS_MODULE)
    }

    pub fn base_script(&self) -> Option<&str> {
        self.modules.get(BASE_MODULE).map(String::as_str)
    }

    pub fn has_required_modules(&self) -> bool {
        self.modules.contains_key(BASE_MODULE) && self.modules.contains_key(SERVERS_MODULE)
    }
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
