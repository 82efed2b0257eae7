// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use super::*;

#[tokio::test]
async fn unscripted_servers_script_yields_an_empty_table() {
    let evaluator = FakeServersEvaluator::new();
    let table = evaluator.servers_table("servers.script text").await.expect("ok");
    assert!(table.is_empty());
}

#[tokio::test]
async fn scripted_servers_table_is_returned() {
    let evaluator = FakeServersEvaluator::new();
    let mut table = HashMap::new();
    table.insert("http://test.example.com".to_string(), "tx".to_string());
    evaluator.script_servers_table("text", table.clone());

    let result = evaluator.servers_table("text").await.expect("ok");
    assert_eq!(result, table);
}

#[tokio::test]
async fn scripted_servers_error_is_surfaced() {
    let evaluator = FakeServersEvaluator::new();
    evaluator.script_servers_error("syntax error on line 3");

    let err = evaluator.servers_table("anything").await.unwrap_err();
    assert!(matches!(err, PackageError::ServersEvaluation(msg) if msg == "syntax error on line 3"));
}

#[tokio::test]
async fn unscripted_interface_table_is_none() {
    let evaluator = FakeServersEvaluator::new();
    let table = evaluator.interface_table("autofarm", "script text").await.expect("ok");
    assert_eq!(table, None);
}

#[tokio::test]
async fn scripted_interface_table_is_returned() {
    let evaluator = FakeServersEvaluator::new();
    let mut table = HashMap::new();
    table.insert("enabled".to_string(), ScriptValue::String("true".to_string()));
    evaluator.script_interface_table("text", table.clone());

    let result = evaluator.interface_table("autofarm", "text").await.expect("ok");
    assert_eq!(result, Some(table));
}
