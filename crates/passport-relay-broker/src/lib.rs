// crates/passport-relay-broker/src/lib.rs
// ============================================================================
// Module: Passport Relay Broker Library
// Description: HTTP transport, wire codec, and exchange client for the broker.
// Purpose: Publish and retrieve dated tokens keyed by number pair.
// Dependencies: passport-relay-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! Passport Relay Broker implements the client side of the out-of-band
//! exchange: a bounded blocking [`TransportClient`], the JSON wire codec for
//! the broker's publish and retrieve operations, and the [`ExchangeClient`]
//! composing the two.
//! Invariants:
//! - Every network round trip is bounded by the configured timeout.
//! - Redirects are never followed; the broker response must be final.
//! - Response bodies are capped at [`MAX_RESPONSE_BYTES`].
//! - No operation retries; retry policy belongs to the caller.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod exchange;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::CodecError;
pub use exchange::ExchangeClient;
pub use exchange::ExchangeError;
pub use transport::MAX_RESPONSE_BYTES;
pub use transport::TransportClient;
pub use transport::TransportError;
