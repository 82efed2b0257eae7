// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assemble a [`hive_core::Package`] from a directory of `<module>.script`
//! files. `hive-package` treats script content
//! as opaque text — it never parses script syntax beyond file names.

use std::collections::HashMap;
use std::path::Path;

use hive_core::Package;
use tracing::debug;

use crate::error::PackageError;
use crate::evaluator::ServersEvaluator;
use crate::interface::build_interface_json;

fn collect_module_scripts(dir: &Path) -> Result<HashMap<String, String>, PackageError> {
    let mut modules = HashMap::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("script") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)?;
        modules.insert(stem.to_string(), content);
    }
    Ok(modules)
}

/// Load `dir` as a package named `name`, running `evaluator` over the
/// `servers` module and every real module's `interface_<module>` table.
pub async fn load_package_dir(
    dir: &Path,
    name: &str,
    evaluator: &impl ServersEvaluator,
) -> Result<Package, PackageError> {
    let modules = collect_module_scripts(dir)?;

    if !modules.contains_key(hive_core::BASE_MODULE) {
        return Err(PackageError::MissingModule("base"));
    }
    let Some(servers_script) = modules.get(hive_core::SERVERS_MODULE) else {
        return Err(PackageError::MissingModule("servers"));
    };

    let servers = evaluator.servers_table(servers_script).await?;
    debug!(package = name, server_count = servers.len(), "evaluated servers table");

    let interface_json = build_interface_json(&modules, evaluator).await?;

    Ok(Package {
        name: name.to_string(),
        servers,
        modules,
        interface_json,
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
