// crates/passport-relay-core/tests/header_date.rs
// ============================================================================
// Module: Header Date Tests
// Description: Unit tests for the RFC 1123 GMT header date stamp.
// Purpose: Pin the rendered layout and budget fit.
// Dependencies: passport-relay-core, time
// ============================================================================

//! ## Overview
//! Validates the header-date layout against known instants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use passport_relay_core::HeaderDate;
use passport_relay_core::MAX_DATE_LENGTH;
use time::macros::datetime;

/// Tests a known instant renders in the fixed GMT layout.
#[test]
fn known_instant_renders_fixed_layout() {
    let date = HeaderDate::from_instant(datetime!(2024-01-01 00:00:00 UTC)).expect("format");
    assert_eq!(date.as_str(), "Mon, 01 Jan 2024 00:00:00 GMT");
}

/// Tests a non-UTC instant is rendered in GMT.
#[test]
fn offset_instant_is_rendered_in_gmt() {
    let date = HeaderDate::from_instant(datetime!(2024-06-15 14:30:05 -5)).expect("format");
    assert_eq!(date.as_str(), "Sat, 15 Jun 2024 19:30:05 GMT");
}

/// Tests the current stamp fits the dated-token date budget.
#[test]
fn stamp_fits_date_budget() {
    let date = HeaderDate::now().expect("stamp");
    assert!(date.as_str().len() <= MAX_DATE_LENGTH);
    assert!(date.as_str().ends_with(" GMT"));
}
