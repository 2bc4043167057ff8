// crates/passport-relay-pri/src/orchestration/mod.rs
// ============================================================================
// Module: Passport Relay Orchestration
// Description: Call-direction state machines over the exchange and engines.
// Purpose: Share the outcome and error types of both orchestrators.
// Dependencies: passport-relay-broker, passport-relay-core
// ============================================================================

//! ## Overview
//! The two orchestrators run synchronously on the call-setup thread and
//! compose the exchange client with the external engines and the call leg's
//! channel. Every lower-layer failure maps into [`OrchestrationError`]; an
//! intentional engine disable maps into [`OrchestrationOutcome::Disabled`],
//! which callers must treat as a trivial success.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod incoming;
pub mod outgoing;

// ============================================================================
// SECTION: Imports
// ============================================================================

use passport_relay_broker::ExchangeError;
use passport_relay_core::ChannelError;
use passport_relay_core::EngineError;
use passport_relay_core::HeaderDateError;
use thiserror::Error;

// ============================================================================
// SECTION: Orchestration Outcome
// ============================================================================

/// Successful outcome of one orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationOutcome {
    /// The exchange ran to completion.
    Completed,
    /// The engine is disabled for this profile; nothing was exchanged.
    Disabled,
}

// ============================================================================
// SECTION: Orchestration Errors
// ============================================================================

/// Hard failures of either orchestrator.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// An engine reported a hard failure.
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
    /// The broker exchange failed.
    #[error("exchange failure: {0}")]
    Exchange(#[from] ExchangeError),
    /// The call leg's channel could not be read or written.
    #[error("channel failure: {0}")]
    Channel(#[from] ChannelError),
    /// The attestation date could not be stamped.
    #[error("header date failure: {0}")]
    Clock(#[from] HeaderDateError),
}
