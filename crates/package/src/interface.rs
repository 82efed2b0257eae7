// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build the JSON interface descriptor: a synthesized
//! `base` module plus, per real module, its `interface_<module>` table.

use std::collections::HashMap;

use serde_json::json;

use crate::error::PackageError;
use crate::evaluator::ServersEvaluator;
use crate::value::ScriptValue;

fn synthesized_base_fields() -> serde_json::Value {
    json!({
        "wait_time_factor": {"type": "slider", "min": 0.2, "max": 3.0},
        "proxy": {"type": "textarea"},
    })
}

/// `modules` is the package's full module map, including `base`/
/// `servers`; both are skipped when walking real modules since `base`
/// gets its synthesized entry instead and `servers` is pure data.
pub async fn build_interface_json(
    modules: &HashMap<String, String>,
    evaluator: &impl ServersEvaluator,
) -> Result<serde_json::Value, PackageError> {
    let mut descriptor = serde_json::Map::new();
    descriptor.insert(hive_core::BASE_MODULE.to_string(), synthesized_base_fields());

    let mut names: Vec<&String> = modules
        .keys()
        .filter(|name| name.as_str() != hive_core::BASE_MODULE && name.as_str() != hive_core::SERVERS_MODULE)
        .collect();
    names.sort();

    for name in names {
        let script = &modules[name];
        if let Some(table) = evaluator.interface_table(name, script).await? {
            descriptor.insert(name.clone(), ScriptValue::Table(table).to_json());
        }
    }

    Ok(serde_json::Value::Object(descriptor))
}

#[cfg(test)]
#[path = "interface_tests.rs"]
mod tests;
