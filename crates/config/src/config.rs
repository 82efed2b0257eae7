// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Config` interface consumed by `hive-engine`.
//!
//! `hive-config` owns only the trait and an in-memory reference impl;
//! durable storage is a caller concern.

use hive_core::ModuleSettings;
use std::collections::HashMap;

/// Typed, mutable view over one agent's persisted settings.
///
/// Implementors must uphold two invariants: `base.wait_time_factor`
/// and `base.proxy` are always present in `module_settings()`, and `valid()`
/// holds iff `username`, `password`, `package` and `server` are all
/// non-empty.
pub trait Config: Send + Sync {
    fn username(&self) -> &str;
    fn password(&self) -> &str;
    fn package(&self) -> &str;
    fn server(&self) -> &str;
    fn identifier(&self) -> &str;

    fn module_settings(&self) -> &ModuleSettings;
    fn cookies(&self) -> &HashMap<String, String>;
    fn set_cookies(&mut self, cookies: HashMap<String, String>);

    /// Read a flat `<module>_<key>` value, or `""` if absent.
    fn value_of(&self, flat_key: &str) -> String;
    /// Write a flat `<module>_<key>` value, creating the module entry if needed.
    fn set_flat(&mut self, flat_key: &str, value: &str);
    /// Write `<module>_<key>`, equivalent to `set_flat(&module_key(module, key), value)`.
    fn set(&mut self, module: &str, key: &str, value: &str) {
        self.set_flat(&hive_core::module_key(module, key), value);
    }

    fn inactive(&self) -> bool;
    fn set_inactive(&mut self, inactive: bool);

    /// Deterministic replay sequence for `agent.init`.
    ///
    /// `base_set_wait_time_factor` is emitted first of all; every other
    /// module then contributes its settings in key order, `active` last.
    /// `base_proxy` is intentionally excluded — the initial proxy list is
    /// applied directly by `agent.init`'s proxy-verification step, not
    /// replayed as a command.
    fn init_command_sequence(&self) -> Vec<(String, String)> {
        let settings = self.module_settings();
        let mut out = Vec::new();

        if let Some(base) = settings.get(hive_core::BASE_MODULE) {
            if let Some(factor) = base.get("wait_time_factor") {
                out.push((
                    hive_core::module_key(hive_core::BASE_MODULE, "wait_time_factor"),
                    factor.clone(),
                ));
            }
        }

        let mut modules: Vec<&String> = settings
            .keys()
            .filter(|m| m.as_str() != hive_core::BASE_MODULE)
            .collect();
        modules.sort();

        for module in modules {
            let Some(keys) = settings.get(module) else { continue };
            let mut names: Vec<&String> = keys.keys().filter(|k| k.as_str() != "active").collect();
            names.sort();
            for key in names {
                out.push((hive_core::module_key(module, key), keys[key].clone()));
            }
            if let Some(active) = keys.get("active") {
                out.push((hive_core::module_key(module, "active"), active.clone()));
            }
        }

        out
    }

    /// Serialize to the Config JSON shape; omits `password` when
    /// `with_password` is `false`.
    fn to_json(&self, with_password: bool) -> String;

    fn valid(&self) -> bool {
        !self.username().is_empty()
            && !self.password().is_empty()
            && !self.package().is_empty()
            && !self.server().is_empty()
    }
}
