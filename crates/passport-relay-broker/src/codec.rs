// crates/passport-relay-broker/src/codec.rs
// ============================================================================
// Module: Passport Relay Broker Codec
// Description: JSON wire shapes for the broker publish and retrieve operations.
// Purpose: Encode publish requests and decode broker responses fail-closed.
// Dependencies: passport-relay-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The broker speaks two JSON shapes: the publish request
//! `{"src", "dst", "passport"}` and its ack `{"message": "OK..."}`, and the
//! retrieve response `{"token": "<date><delim><token>"}` whose `token` field
//! carries the full delimited dated-token string despite its name.
//! Invariants:
//! - Decoders never panic on arbitrary byte input.
//! - A publish ack is accepted only when `message` is a string starting with
//!   the literal `OK` (case-sensitive).
//! - Unknown extra fields in broker responses are tolerated; missing or
//!   mistyped required fields are not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use passport_relay_core::NumberPair;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Codec Errors
// ============================================================================

/// Errors raised by the broker wire codec.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The outbound request could not be serialized.
    #[error("publish encode failed: {0}")]
    Encode(String),
    /// The broker body was not the expected JSON shape.
    #[error("malformed broker response: {0}")]
    Malformed(String),
    /// The broker answered a well-formed but non-OK publish ack.
    #[error("broker rejected publish: {0}")]
    Rejected(String),
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Publish request body sent to the broker.
#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    /// Originating subscriber number.
    src: &'a str,
    /// Terminating subscriber number.
    dst: &'a str,
    /// Serialized dated token.
    passport: &'a str,
}

/// Publish ack returned by the broker.
#[derive(Debug, Deserialize)]
struct PublishAck {
    /// Human-readable status; must start with `OK`.
    message: String,
}

/// Retrieve response returned by the broker.
#[derive(Debug, Deserialize)]
struct FetchResponse {
    /// Full delimited dated-token string (the field name is historical).
    token: String,
}

// ============================================================================
// SECTION: Codec Operations
// ============================================================================

/// Encodes the publish request for one number pair and serialized token.
///
/// # Errors
///
/// Returns [`CodecError`] when serialization fails.
pub fn encode_publish(pair: &NumberPair, passport: &str) -> Result<Vec<u8>, CodecError> {
    let request = PublishRequest {
        src: pair.source(),
        dst: pair.destination(),
        passport,
    };
    serde_json::to_vec(&request).map_err(|err| CodecError::Encode(err.to_string()))
}

/// Decodes a publish ack, requiring an `OK`-prefixed string `message`.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for non-JSON bodies or a missing or
/// mistyped field and [`CodecError::Rejected`] for any other message value.
pub fn decode_publish_ack(body: &[u8]) -> Result<(), CodecError> {
    let ack: PublishAck =
        serde_json::from_slice(body).map_err(|err| CodecError::Malformed(err.to_string()))?;
    if ack.message.starts_with("OK") {
        Ok(())
    } else {
        Err(CodecError::Rejected(ack.message))
    }
}

/// Decodes a retrieve response, returning the delimited dated-token string.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for non-JSON bodies or a missing or
/// mistyped `token` field.
pub fn decode_fetch(body: &[u8]) -> Result<String, CodecError> {
    let response: FetchResponse =
        serde_json::from_slice(body).map_err(|err| CodecError::Malformed(err.to_string()))?;
    Ok(response.token)
}
