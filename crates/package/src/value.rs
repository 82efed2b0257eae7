// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The restricted value set a script may export into an `interface_*`
//! table: strings and string-keyed tables of the same.
//! Anything outside that set becomes JSON `null`.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    String(String),
    Table(HashMap<String, ScriptValue>),
    /// Anything the sandboxed interpreter produced outside the
    /// string/table set — always renders as `null`.
    Other,
}

impl ScriptValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ScriptValue::String(s) => serde_json::Value::String(s.clone()),
            ScriptValue::Table(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json());
                }
                serde_json::Value::Object(object)
            }
            ScriptValue::Other => serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
