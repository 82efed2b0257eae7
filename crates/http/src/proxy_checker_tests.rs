// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::*;

#[tokio::test]
async fn keeps_only_proxies_the_predicate_accepts() {
    let good: Arc<[&str]> = Arc::from(["10.0.0.1:8080", "10.0.0.3:8080"]);
    let survivors = verify_proxies(
        vec![
            "10.0.0.1:8080".to_string(),
            "10.0.0.2:8080".to_string(),
            "10.0.0.3:8080".to_string(),
        ],
        move |proxy| {
            let good = Arc::clone(&good);
            async move { good.contains(&proxy.as_str()) }
        },
    )
    .await;

    assert_eq!(survivors, vec!["10.0.0.1:8080", "10.0.0.3:8080"]);
}

#[tokio::test]
async fn property_9_result_is_commutative_in_input_order() {
    let input_a = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let mut input_b = input_a.clone();
    input_b.reverse();

    let predicate = |p: String| async move { p != "b" };

    let mut survivors_a = verify_proxies(input_a, predicate).await;
    let mut survivors_b = verify_proxies(input_b, predicate).await;
    survivors_a.sort();
    survivors_b.sort();

    assert_eq!(survivors_a, survivors_b);
}

#[tokio::test]
async fn empty_input_yields_empty_output() {
    let survivors = verify_proxies(Vec::new(), |_: String| async { true }).await;
    assert!(survivors.is_empty());
}
