// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn codes_match_spec_table() {
    assert_eq!(CapabilityError::InvalidXpath("//bad[".into()).code(), 201);
    assert_eq!(CapabilityError::NoFormOrSubmit.code(), 202);
    assert_eq!(CapabilityError::SubmitNotInForm.code(), 203);
    assert_eq!(CapabilityError::ParamMismatch("x".into()).code(), 204);
    assert_eq!(CapabilityError::GzipFailure.code(), 205);
}

#[test]
fn gzip_transport_error_maps_to_gzip_failure() {
    let err: CapabilityError = hive_http::HttpError::GzipFailure.into();
    assert_eq!(err, CapabilityError::GzipFailure);
}

#[test]
fn other_transport_errors_map_to_transport() {
    let err: CapabilityError = hive_http::HttpError::Timeout(std::time::Duration::from_secs(15)).into();
    assert!(matches!(err, CapabilityError::Transport(_)));
}
