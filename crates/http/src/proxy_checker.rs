// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `proxy_checker`: verify a proxy list in parallel against a caller
//! predicate, bounded by a single deadline.
//!
//! Verification is commutative in the input list:
//! the surviving set depends only on the input set and the predicate,
//! never on call order, because every proxy is checked independently and
//! results are filtered back in input order.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;

/// Deadline for the whole verification batch, not per-proxy.
pub const VERIFY_DEADLINE: Duration = Duration::from_secs(30);

/// Run `predicate` against every proxy concurrently; return the subset
/// that passed, in the same relative order as `proxies`. A proxy whose
/// check does not finish before `VERIFY_DEADLINE` is treated as failed.
pub async fn verify_proxies<P, Fut>(proxies: Vec<String>, predicate: P) -> Vec<String>
where
    P: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let mut set = JoinSet::new();
    for (index, proxy) in proxies.iter().cloned().enumerate() {
        let fut = predicate(proxy);
        set.spawn(async move { (index, fut.await) });
    }

    let mut survived = vec![false; proxies.len()];
    let _ = tokio::time::timeout(VERIFY_DEADLINE, async {
        while let Some(joined) = set.join_next().await {
            if let Ok((index, ok)) = joined {
                survived[index] = ok;
            }
        }
    })
    .await;

    proxies
        .into_iter()
        .zip(survived)
        .filter_map(|(proxy, ok)| ok.then_some(proxy))
        .collect()
}

#[cfg(test)]
#[path = "proxy_checker_tests.rs"]
mod tests;
