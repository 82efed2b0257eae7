// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `get_by_regex`/`get_all_by_regex`.

use regex::Regex;

use crate::error::CapabilityError;

/// Group 1 of the first match, or `""` if nothing matches.
pub fn get_by_regex(text: &str, pattern: &str) -> Result<String, CapabilityError> {
    let re = Regex::new(pattern).map_err(|e| CapabilityError::InvalidRegex(e.to_string()))?;
    Ok(re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default())
}

/// Every match, each as its list of captured groups (group 0 excluded).
pub fn get_all_by_regex(text: &str, pattern: &str) -> Result<Vec<Vec<String>>, CapabilityError> {
    let re = Regex::new(pattern).map_err(|e| CapabilityError::InvalidRegex(e.to_string()))?;
    Ok(re
        .captures_iter(text)
        .map(|c| {
            c.iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
        .collect())
}

#[cfg(test)]
#[path = "regex_util_tests.rs"]
mod tests;
