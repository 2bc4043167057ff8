// crates/passport-relay-core/src/lib.rs
// ============================================================================
// Module: Passport Relay Core Library
// Description: Data model and interfaces for out-of-band PASSporT exchange.
// Purpose: Define dated tokens, call identifiers, outcomes, and engine contracts.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Passport Relay Core defines the value types exchanged between a telephony
//! switch and an out-of-band attestation broker: the delimited
//! [`DatedToken`], the [`NumberPair`] identifying a call leg, the
//! [`SessionId`] log correlation handle, and the backend-agnostic engine and
//! call-channel interfaces the orchestrators are written against.
//! Invariants:
//! - Dated tokens never contain their delimiter and respect hard length budgets.
//! - Oversized or malformed values are rejected with structured errors, never
//!   truncated.
//! - No type in this crate performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::dated_token::DEFAULT_DELIMITER;
pub use crate::core::dated_token::DatedToken;
pub use crate::core::dated_token::DatedTokenError;
pub use crate::core::dated_token::MAX_DATE_LENGTH;
pub use crate::core::dated_token::MAX_TOKEN_LENGTH;
pub use crate::core::identifiers::NumberPair;
pub use crate::core::identifiers::SessionId;
pub use crate::core::outcome::EngineOutcome;
pub use crate::core::outcome::ResponseCode;
pub use crate::core::time::HeaderDate;
pub use crate::core::time::HeaderDateError;
pub use interfaces::AttestationContext;
pub use interfaces::AttestationEngine;
pub use interfaces::CallChannel;
pub use interfaces::ChannelError;
pub use interfaces::DATE_HEADER_VAR;
pub use interfaces::EngineError;
pub use interfaces::IDENTITY_HEADER_VAR;
pub use interfaces::VerificationContext;
pub use interfaces::VerificationEngine;
