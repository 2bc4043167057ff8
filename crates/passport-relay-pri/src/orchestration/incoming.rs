// crates/passport-relay-pri/src/orchestration/incoming.rs
// ============================================================================
// Module: Passport Relay Incoming Orchestrator
// Description: Fetch-and-verify state machine for terminating call legs.
// Purpose: Retrieve the dated token, restore it onto the leg, and verify it.
// Dependencies: passport-relay-broker, passport-relay-core, tracing
// ============================================================================

//! ## Overview
//! On termination the dated token is fetched from the broker, written onto
//! the leg's channel so downstream signaling sees it as if it had arrived
//! in-band, and fed to the verification engine. There is no disabled state
//! at the fetch step; a missing token is a hard failure. Verification
//! failure is reported, never acted on — call treatment belongs to the
//! dialplan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use passport_relay_broker::ExchangeClient;
use passport_relay_core::CallChannel;
use passport_relay_core::EngineOutcome;
use passport_relay_core::NumberPair;
use passport_relay_core::SessionId;
use passport_relay_core::VerificationEngine;

use crate::orchestration::OrchestrationError;
use crate::orchestration::OrchestrationOutcome;

// ============================================================================
// SECTION: Fetch And Verify
// ============================================================================

/// Runs the incoming exchange for one terminating call leg.
///
/// # Errors
///
/// Returns [`OrchestrationError`] when the fetch, either channel write, or
/// verification fails; an intentional engine disable after the headers are
/// restored is the [`OrchestrationOutcome::Disabled`] success.
pub fn fetch_and_verify(
    engine: &dyn VerificationEngine,
    exchange: &ExchangeClient,
    channel: &dyn CallChannel,
    profile: &str,
    pair: &NumberPair,
    session: &SessionId,
) -> Result<OrchestrationOutcome, OrchestrationError> {
    let dated = exchange.fetch_token(pair, session)?;
    channel.set_identity_header(dated.token())?;
    channel.set_date_header(dated.date())?;
    let context = engine.create_context(channel, pair.source(), profile)?;
    let mut context = match context {
        EngineOutcome::Ready(context) => context,
        EngineOutcome::Disabled => {
            tracing::debug!("{session} verification disabled for profile {profile}");
            return Ok(OrchestrationOutcome::Disabled);
        }
    };
    context.add_identity_header(dated.token())?;
    context.add_date_header(dated.date())?;
    context.verify()?;
    Ok(OrchestrationOutcome::Completed)
}
