// crates/passport-relay-pri/src/lib.rs
// ============================================================================
// Module: Passport Relay PRI Library
// Description: Call-direction orchestrators and PRI request entry points.
// Purpose: Bridge call setup signaling to the out-of-band token exchange.
// Dependencies: passport-relay-broker, passport-relay-config, passport-relay-core
// ============================================================================

//! ## Overview
//! Passport Relay PRI sits between the switch's call-setup path and the
//! broker exchange. The outgoing orchestrator attests and publishes; the
//! incoming orchestrator fetches and verifies. [`PriExchange`] wraps both
//! behind the two request entry points with the enable gate, session
//! derivation, and tri-state response mapping.
//! Invariants:
//! - Entry points never panic and never block call completion on their own
//!   account; failures surface only as [`passport_relay_core::ResponseCode`]
//!   values and session-tagged log events.
//! - Disabled is always a distinguished success.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod channel;
pub mod orchestration;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use channel::MemoryCallChannel;
pub use orchestration::OrchestrationError;
pub use orchestration::OrchestrationOutcome;
pub use orchestration::incoming::fetch_and_verify;
pub use orchestration::outgoing::attest_and_publish;
pub use request::PriExchange;
