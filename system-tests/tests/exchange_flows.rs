// system-tests/tests/exchange_flows.rs
// ============================================================================
// Module: Exchange Flow Suite
// Description: End-to-end scenarios over a live loopback broker.
// Purpose: Exercise both call directions through the public entry points.
// Dependencies: system-tests, passport-relay-pri, passport-relay-config
// ============================================================================
//! ## Overview
//! Drives the public entry points against a live loopback broker with
//! scripted engines: publish on origination, retrieve-and-verify on
//! termination, disabled short-circuits, and unreachable-broker failure
//! bounds.

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

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use passport_relay_config::ExchangeConfig;
use passport_relay_core::ResponseCode;
use passport_relay_pri::MemoryCallChannel;
use passport_relay_pri::PriExchange;
use system_tests::engines::ScriptedAttestation;
use system_tests::engines::ScriptedVerification;
use system_tests::harness::LoopbackBroker;
use system_tests::logging::init_tracing;
use url::Url;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const SOURCE: &str = "+15551234567";
const DESTINATION: &str = "+15559876543";
const DIAL_STRING: &str = "PJSIP/+15559876543";

/// Builds an enabled configuration pointing at the given broker.
fn enabled_config(base: &Url) -> ExchangeConfig {
    let body = format!(
        r#"{{
            "pri_stir_shaken_enable": true,
            "pri_stir_shaken_profile_name": "carrier-a",
            "oob_proxy_url": "{base}"
        }}"#
    );
    ExchangeConfig::from_json(&body).expect("config")
}

/// Wires an exchange against the broker with the given engines.
fn wired(
    base: &Url,
    attestation: Arc<ScriptedAttestation>,
    verification: Arc<ScriptedVerification>,
) -> PriExchange {
    PriExchange::new(enabled_config(base), attestation, verification).expect("wire")
}

/// Returns a base URL whose port is closed.
fn unreachable_base() -> Url {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    Url::parse(&format!("http://127.0.0.1:{port}")).expect("base url")
}

// ============================================================================
// SECTION: Scenario A — Outgoing Publish
// ============================================================================

/// Tests origination attests and publishes a dated passport to the broker.
#[test]
fn outgoing_request_publishes_dated_passport() {
    init_tracing();
    let broker = LoopbackBroker::start().expect("broker");
    let attestation = Arc::new(ScriptedAttestation::signing("tok123"));
    let verification = Arc::new(ScriptedVerification::accepting());
    let exchange = wired(broker.base_url(), Arc::clone(&attestation), verification);
    let channel = MemoryCallChannel::new();

    let code = exchange.outgoing_request(SOURCE, DIAL_STRING, &channel);
    assert_eq!(code, ResponseCode::Ok);
    assert_eq!(attestation.created_count(), 1);

    let passport = broker.stored(SOURCE, DESTINATION).expect("stored passport");
    let (date, token) = passport.split_once('&').expect("delimited passport");
    assert!(date.ends_with(" GMT"));
    assert_eq!(token, "tok123");
}

// ============================================================================
// SECTION: Scenario B — Incoming Fetch And Verify
// ============================================================================

/// Tests termination restores broker headers onto the leg and verifies them.
#[test]
fn incoming_request_restores_headers_and_verifies() {
    init_tracing();
    let broker = LoopbackBroker::start().expect("broker");
    broker.seed(SOURCE, DESTINATION, "Mon, 01 Jan 2024 00:00:00 GMT&tok123");
    let attestation = Arc::new(ScriptedAttestation::signing("unused"));
    let verification = Arc::new(ScriptedVerification::accepting());
    let exchange = wired(broker.base_url(), attestation, Arc::clone(&verification));
    let channel = MemoryCallChannel::new();

    let code = exchange.incoming_request(SOURCE, DESTINATION, &channel);
    assert_eq!(code, ResponseCode::Ok);

    use passport_relay_core::CallChannel;
    assert_eq!(channel.identity_header().expect("read"), Some("tok123".to_string()));
    assert_eq!(
        channel.date_header().expect("read"),
        Some("Mon, 01 Jan 2024 00:00:00 GMT".to_string())
    );

    let observed = verification.observed();
    assert_eq!(observed.identity.as_deref(), Some("tok123"));
    assert_eq!(observed.date.as_deref(), Some("Mon, 01 Jan 2024 00:00:00 GMT"));
    assert!(observed.verified);
}

// ============================================================================
// SECTION: Scenario C — Unreachable Broker
// ============================================================================

/// Tests both entry points fail within the timeout bound when the broker is
/// unreachable.
#[test]
fn unreachable_broker_fails_within_timeout() {
    init_tracing();
    let base = unreachable_base();
    let attestation = Arc::new(ScriptedAttestation::signing("tok123"));
    let verification = Arc::new(ScriptedVerification::accepting());
    let exchange = wired(&base, attestation, verification);
    let channel = MemoryCallChannel::new();

    let started = Instant::now();
    let outgoing = exchange.outgoing_request(SOURCE, DIAL_STRING, &channel);
    let incoming = exchange.incoming_request(SOURCE, DESTINATION, &channel);
    let elapsed = started.elapsed();

    assert_eq!(outgoing, ResponseCode::Failed);
    assert_eq!(incoming, ResponseCode::Failed);
    // Two exchanges, each bounded by the 3 s default timeout.
    assert!(elapsed < Duration::from_secs(8), "exchange stalled for {elapsed:?}");
}

// ============================================================================
// SECTION: Scenario D — Disabled Engine
// ============================================================================

/// Tests a disabled attestation engine is a trivial success with no publish.
#[test]
fn disabled_attestation_is_trivial_success() {
    init_tracing();
    let broker = LoopbackBroker::start().expect("broker");
    let attestation = Arc::new(ScriptedAttestation::disabled());
    let verification = Arc::new(ScriptedVerification::accepting());
    let exchange = wired(broker.base_url(), Arc::clone(&attestation), verification);
    let channel = MemoryCallChannel::new();

    let code = exchange.outgoing_request(SOURCE, DIAL_STRING, &channel);
    assert_eq!(code, ResponseCode::Ok);
    assert_eq!(attestation.created_count(), 1);
    assert_eq!(broker.stored(SOURCE, DESTINATION), None);
}

// ============================================================================
// SECTION: Feature Gate
// ============================================================================

/// Tests the process-wide flag short-circuits with no broker traffic.
#[test]
fn feature_off_short_circuits() {
    init_tracing();
    let broker = LoopbackBroker::start().expect("broker");
    let attestation = Arc::new(ScriptedAttestation::signing("tok123"));
    let verification = Arc::new(ScriptedVerification::accepting());
    let exchange =
        PriExchange::new(
            ExchangeConfig::disabled(),
            Arc::<ScriptedAttestation>::clone(&attestation),
            verification,
        )
            .expect("wire");
    let channel = MemoryCallChannel::new();

    assert_eq!(exchange.outgoing_request(SOURCE, DIAL_STRING, &channel), ResponseCode::Disabled);
    assert_eq!(exchange.incoming_request(SOURCE, DESTINATION, &channel), ResponseCode::Disabled);
    assert_eq!(attestation.created_count(), 0);
    assert_eq!(broker.stored(SOURCE, DESTINATION), None);
}

// ============================================================================
// SECTION: Round Trip
// ============================================================================

/// Tests a full originate-then-terminate round trip through one broker.
#[test]
fn publish_then_fetch_round_trip() {
    init_tracing();
    let broker = LoopbackBroker::start().expect("broker");

    let originating = wired(
        broker.base_url(),
        Arc::new(ScriptedAttestation::signing("tok-round-trip")),
        Arc::new(ScriptedVerification::accepting()),
    );
    let outgoing_leg = MemoryCallChannel::new();
    assert_eq!(
        originating.outgoing_request(SOURCE, DIAL_STRING, &outgoing_leg),
        ResponseCode::Ok
    );

    let verification = Arc::new(ScriptedVerification::accepting());
    let terminating = wired(
        broker.base_url(),
        Arc::new(ScriptedAttestation::signing("unused")),
        Arc::clone(&verification),
    );
    let incoming_leg = MemoryCallChannel::new();
    assert_eq!(
        terminating.incoming_request(SOURCE, DESTINATION, &incoming_leg),
        ResponseCode::Ok
    );

    let observed = verification.observed();
    assert_eq!(observed.identity.as_deref(), Some("tok-round-trip"));
    assert!(observed.verified);
}
