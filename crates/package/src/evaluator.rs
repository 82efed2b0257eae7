// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sandboxed evaluation of a package's two script-exported tables: the
//! `servers` module's URL -> tag map, and each real
//! module's optional `interface_<module>` table. Both are the same
//! concern — run an opaque script in a sandbox and read one table back
//! out of it — so one trait covers both; `hive-package` never parses or
//! interprets script syntax itself.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::PackageError;
use crate::value::ScriptValue;

#[async_trait]
pub trait ServersEvaluator: Send + Sync + 'static {
    /// Execute `servers_script` (the `servers` module's text) and return
    /// its URL -> short-tag table.
    async fn servers_table(&self, servers_script: &str) -> Result<HashMap<String, String>, PackageError>;

    /// Execute `module_script` and return the `interface_<module>` table
    /// it exports, or `None` if the module exports no such table.
    async fn interface_table(
        &self,
        module: &str,
        module_script: &str,
    ) -> Result<Option<HashMap<String, ScriptValue>>, PackageError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::ServersEvaluator;
    use crate::error::PackageError;
    use crate::value::ScriptValue;

    #[derive(Default)]
    struct FakeState {
        servers_tables: HashMap<String, HashMap<String, String>>,
        interface_tables: HashMap<String, HashMap<String, ScriptValue>>,
        servers_error: Option<String>,
    }

    /// Deterministic stand-in for a sandboxed script interpreter: scripts
    /// are keyed by their literal text rather than actually executed.
    #[derive(Clone, Default)]
    pub struct FakeServersEvaluator {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeServersEvaluator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script_servers_table(&self, servers_script: impl Into<String>, table: HashMap<String, String>) {
            self.inner.lock().servers_tables.insert(servers_script.into(), table);
        }

        pub fn script_servers_error(&self, message: impl Into<String>) {
            self.inner.lock().servers_error = Some(message.into());
        }

        pub fn script_interface_table(
            &self,
            module_script: impl Into<String>,
            table: HashMap<String, ScriptValue>,
        ) {
            self.inner.lock().interface_tables.insert(module_script.into(), table);
        }
    }

    #[async_trait]
    impl ServersEvaluator for FakeServersEvaluator {
        async fn servers_table(&self, servers_script: &str) -> Result<HashMap<String, String>, PackageError> {
            let inner = self.inner.lock();
            if let Some(message) = &inner.servers_error {
                return Err(PackageError::ServersEvaluation(message.clone()));
            }
            Ok(inner.servers_tables.get(servers_script).cloned().unwrap_or_default())
        }

        async fn interface_table(
            &self,
            _module: &str,
            module_script: &str,
        ) -> Result<Option<HashMap<String, ScriptValue>>, PackageError> {
            Ok(self.inner.lock().interface_tables.get(module_script).cloned())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeServersEvaluator;

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
