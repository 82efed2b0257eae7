// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn injects_location_meta_into_head() {
    let out = tidy("<html><head><title>x</title></head><body></body></html>", "https://example.com/a");
    assert!(out.contains(r#"<meta name="location" content="https://example.com/a">"#));
    assert!(out.find("meta").unwrap() > out.find("<head").unwrap());
}

#[test]
fn prepends_meta_when_head_is_missing() {
    let out = tidy("<body>hi</body>", "https://example.com/b");
    assert!(out.starts_with(r#"<meta name="location""#));
}

#[test]
fn rewrites_bare_disabled_attribute() {
    let out = tidy(r#"<input type="text" disabled>"#, "https://example.com/c");
    assert!(out.contains(r#"disabled="true""#));
    assert!(!out.contains("type=\"text\" disabled>"));
}

#[test]
fn leaves_valued_disabled_attribute_untouched() {
    let out = tidy(r#"<input disabled="true">"#, "https://example.com/d");
    assert_eq!(out.matches("disabled=\"true\"").count(), 1);
}

#[test]
fn is_deterministic_given_identical_input() {
    let a = tidy("<head></head><input disabled>", "https://example.com/e");
    let b = tidy("<head></head><input disabled>", "https://example.com/e");
    assert_eq!(a, b);
}
