// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference `Config` implementation: everything lives in memory, nothing
//! is durable across process restarts.

use std::collections::{BTreeMap, HashMap};

use hive_core::{ModuleSettings, BASE_MODULE};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ConfigError;

const DEFAULT_WAIT_TIME_FACTOR: &str = "1.00";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigJson {
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    package: String,
    server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cookies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    modules: BTreeMap<String, BTreeMap<String, String>>,
}

/// In-memory `Config`. Constructed fresh or via [`InMemoryConfig::from_json`].
#[derive(Debug, Clone)]
pub struct InMemoryConfig {
    username: String,
    password: String,
    package: String,
    server: String,
    identifier: String,
    modules: ModuleSettings,
    cookies: HashMap<String, String>,
    inactive: bool,
}

impl InMemoryConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        package: impl Into<String>,
        server: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        let mut modules = ModuleSettings::new();
        ensure_base_defaults(&mut modules);
        Self {
            username: username.into(),
            password: password.into(),
            package: package.into(),
            server: server.into(),
            identifier: identifier.into(),
            modules,
            cookies: HashMap::new(),
            inactive: false,
        }
    }

    /// Parse the Config JSON wire shape. `identifier` is supplied
    /// separately: it is derived by the caller from `(username, package,
    /// server)` via `hive_core::compute_identifier`, not carried in the
    /// wire format.
    pub fn from_json(
        raw: &str,
        identifier: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let parsed: ConfigJson = serde_json::from_str(raw)?;
        let mut modules: ModuleSettings = parsed
            .modules
            .into_iter()
            .map(|(module, keys)| (module, keys.into_iter().collect()))
            .collect();
        ensure_base_defaults(&mut modules);

        Ok(Self {
            username: parsed.username,
            password: parsed.password.unwrap_or_default(),
            package: parsed.package,
            server: parsed.server,
            identifier: identifier.into(),
            modules,
            cookies: parsed
                .cookies
                .map(|m| m.into_iter().collect())
                .unwrap_or_default(),
            inactive: false,
        })
    }
}

fn ensure_base_defaults(modules: &mut ModuleSettings) {
    let base = modules.entry(BASE_MODULE.to_string()).or_default();
    base.entry("wait_time_factor".to_string())
        .or_insert_with(|| DEFAULT_WAIT_TIME_FACTOR.to_string());
    base.entry("proxy".to_string()).or_default();
}

impl Config for InMemoryConfig {
    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn package(&self) -> &str {
        &self.package
    }

    fn server(&self) -> &str {
        &self.server
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn module_settings(&self) -> &ModuleSettings {
        &self.modules
    }

    fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    fn set_cookies(&mut self, cookies: HashMap<String, String>) {
        self.cookies = cookies;
    }

    fn value_of(&self, flat_key: &str) -> String {
        let Some((module, key)) = hive_core::split_scoped_key(flat_key) else {
            return String::new();
        };
        self.modules
            .get(module)
            .and_then(|keys| keys.get(key))
            .cloned()
            .unwrap_or_default()
    }

    fn set_flat(&mut self, flat_key: &str, value: &str) {
        let Some((module, key)) = hive_core::split_scoped_key(flat_key) else {
            return;
        };
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn inactive(&self) -> bool {
        self.inactive
    }

    fn set_inactive(&mut self, inactive: bool) {
        self.inactive = inactive;
    }

    fn to_json(&self, with_password: bool) -> String {
        let wire = ConfigJson {
            username: self.username.clone(),
            password: with_password.then(|| self.password.clone()),
            package: self.package.clone(),
            server: self.server.clone(),
            cookies: (!self.cookies.is_empty())
                .then(|| self.cookies.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            modules: self
                .modules
                .iter()
                .map(|(module, keys)| {
                    (
                        module.clone(),
                        keys.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                    )
                })
                .collect(),
        };
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "in_memory_tests.rs"]
mod tests;
