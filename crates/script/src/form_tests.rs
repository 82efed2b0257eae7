// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const LOGIN_PAGE: &str = r#"
<html><body>
  <form action="/do-login" method="post">
    <input type="text" name="username" value="">
    <input type="password" name="password" value="">
    <input type="hidden" name="csrf" value="abc123">
    <input type="checkbox" name="remember" value="yes" checked>
    <input type="checkbox" name="newsletter" value="yes">
    <select name="role">
      <option value="guest">Guest</option>
      <option value="admin" selected>Admin</option>
    </select>
    <button type="submit" name="submit" value="go">Sign in</button>
  </form>
</body></html>
"#;

#[test]
fn locates_form_directly_and_extracts_defaults() {
    let submission = prepare_submission(LOGIN_PAGE, "//form", &[], None).expect("form found");

    assert_eq!(submission.action, "/do-login");
    let as_map: std::collections::HashMap<_, _> = submission.fields.into_iter().collect();
    assert_eq!(as_map.get("csrf"), Some(&"abc123".to_string()));
    assert_eq!(as_map.get("role"), Some(&"admin".to_string()));
    assert_eq!(as_map.get("remember"), Some(&"yes".to_string()));
    assert_eq!(as_map.get("newsletter"), None, "unchecked checkbox is not submitted");
}

#[test]
fn locates_form_by_walking_up_from_submit_node() {
    let submission =
        prepare_submission(LOGIN_PAGE, "//button[@name='submit']", &[], None).expect("form found by walking up");

    assert_eq!(submission.action, "/do-login");
}

#[test]
fn overlays_caller_params_on_defaults() {
    let params = vec![
        ("username".to_string(), "alice".to_string()),
        ("password".to_string(), "hunter2".to_string()),
    ];
    let submission = prepare_submission(LOGIN_PAGE, "//form", &params, None).expect("form found");

    let as_map: std::collections::HashMap<_, _> = submission.fields.into_iter().collect();
    assert_eq!(as_map.get("username"), Some(&"alice".to_string()));
    assert_eq!(as_map.get("password"), Some(&"hunter2".to_string()));
    assert_eq!(as_map.get("csrf"), Some(&"abc123".to_string()));
}

#[test]
fn unknown_caller_param_is_param_mismatch() {
    let params = vec![("does_not_exist".to_string(), "x".to_string())];
    let err = prepare_submission(LOGIN_PAGE, "//form", &params, None).unwrap_err();
    assert!(matches!(err, CapabilityError::ParamMismatch(key) if key == "does_not_exist"));
}

#[test]
fn submit_node_outside_any_form_is_submit_not_in_form() {
    let page = r#"<html><body><button name="lone">Go</button></body></html>"#;
    let err = prepare_submission(page, "//button", &[], None).unwrap_err();
    assert!(matches!(err, CapabilityError::SubmitNotInForm));
}

#[test]
fn no_match_for_xpath_is_no_form_or_submit() {
    let err = prepare_submission(LOGIN_PAGE, "//section", &[], None).unwrap_err();
    assert!(matches!(err, CapabilityError::NoFormOrSubmit));
}

#[test]
fn explicit_action_override_wins_over_form_attribute() {
    let submission = prepare_submission(LOGIN_PAGE, "//form", &[], Some("https://other.example.com/submit"))
        .expect("form found");

    assert_eq!(submission.action, "https://other.example.com/submit");
}

#[test]
fn missing_action_attribute_yields_empty_action() {
    let page = r#"<html><body><form><input name="a" value="1"></form></body></html>"#;
    let submission = prepare_submission(page, "//form", &[], None).expect("form found");
    assert_eq!(submission.action, "");
}

#[test]
fn is_absolute_distinguishes_full_urls_from_paths() {
    assert!(is_absolute("https://example.com/submit.php"));
    assert!(!is_absolute("/submit.php"));
    assert!(!is_absolute("submit.php"));
}
