// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide agent registry and package map.
//!
//! Capability calls from scripts recover an agent by string identifier,
//! so this is modeled as an explicit value rather than a thread-local or
//! a singleton — test code constructs its own `Runtime` to avoid
//! cross-test bleed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hive_core::{LogLevel, Package};
use hive_http::HttpSession;
use hive_script::{CapabilityError, CapabilityHost, ScriptEngine};
use parking_lot::RwLock;

use crate::agent::Agent;
use crate::error::EngineError;
use hive_config::Config;

/// Multiple-reader/single-writer registry of live agents and loaded
/// packages.
pub struct Runtime<C: Config + 'static, S: HttpSession, E: ScriptEngine> {
    agents: RwLock<HashMap<String, Arc<Agent<C, S, E>>>>,
    packages: RwLock<HashMap<String, Arc<Package>>>,
}

impl<C: Config + 'static, S: HttpSession, E: ScriptEngine> Default for Runtime<C, S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config + 'static, S: HttpSession, E: ScriptEngine> Runtime<C, S, E> {
    pub fn new() -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            packages: RwLock::new(HashMap::new()),
        }
    }

    pub fn register_package(&self, package: Arc<Package>) {
        self.packages.write().insert(package.name.clone(), package);
    }

    pub fn package(&self, name: &str) -> Option<Arc<Package>> {
        self.packages.read().get(name).cloned()
    }

    /// Register a new agent. Fails if `identifier` is already taken —
    /// identifiers are unique within the hosting process.
    pub fn register_agent(&self, agent: Arc<Agent<C, S, E>>) -> Result<(), EngineError> {
        let mut agents = self.agents.write();
        if agents.contains_key(agent.identifier()) {
            return Err(EngineError::DuplicateIdentifier(agent.identifier().to_string()));
        }
        agents.insert(agent.identifier().to_string(), agent);
        Ok(())
    }

    pub fn agent(&self, identifier: &str) -> Result<Arc<Agent<C, S, E>>, EngineError> {
        self.agents
            .read()
            .get(identifier)
            .cloned()
            .ok_or_else(|| EngineError::UnknownAgent(identifier.to_string()))
    }

    pub fn unregister_agent(&self, identifier: &str) {
        self.agents.write().remove(identifier);
    }

    pub fn agent_count(&self) -> usize {
        self.agents.read().len()
    }
}

/// Capability calls address an agent by identifier through the registry,
/// not by holding a direct reference — this is the seam that inverts the
/// hive-script/hive-engine dependency: hive-script defines `CapabilityHost`,
/// hive-engine provides it.
#[async_trait]
impl<C: Config + 'static, S: HttpSession, E: ScriptEngine> CapabilityHost for Runtime<C, S, E> {
    type Session = S;

    async fn session(&self, identifier: &str) -> Result<Self::Session, CapabilityError> {
        Ok(self.agent(identifier)?.session_handle())
    }

    async fn set_status(
        &self,
        identifier: &str,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CapabilityError> {
        self.agent(identifier)?.execute(&format!("{module}_set_{key}"), value);
        Ok(())
    }

    fn log(&self, identifier: &str, module: &str, level: LogLevel, message: &str) {
        if let Ok(agent) = self.agent(identifier) {
            agent.log_line(level, module, message);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
