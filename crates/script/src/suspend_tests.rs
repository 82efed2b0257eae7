// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn ready_resolves_without_polling_a_future() {
    let suspend: Suspend<u32> = Suspend::ready(7);
    assert_eq!(suspend.resolve().await, 7);
}

#[tokio::test]
async fn pending_resolves_to_the_future_output() {
    let suspend: Suspend<u32> = Suspend::pending(async {
        tokio::task::yield_now().await;
        42
    });
    assert_eq!(suspend.resolve().await, 42);
}
