// crates/passport-relay-pri/src/orchestration/outgoing.rs
// ============================================================================
// Module: Passport Relay Outgoing Orchestrator
// Description: Attest-and-publish state machine for originating call legs.
// Purpose: Produce or reuse a dated token and publish it to the broker.
// Dependencies: passport-relay-broker, passport-relay-core, tracing
// ============================================================================

//! ## Overview
//! On origination the leg may already carry attestation headers from a prior
//! hop; those are reused verbatim and the engine is never consulted.
//! Otherwise a fresh header date is stamped and the attestation engine signs
//! a new token. Either way the dated token is published under the number
//! pair so the terminating side can retrieve it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use passport_relay_broker::ExchangeClient;
use passport_relay_core::AttestationEngine;
use passport_relay_core::CallChannel;
use passport_relay_core::DatedToken;
use passport_relay_core::EngineOutcome;
use passport_relay_core::HeaderDate;
use passport_relay_core::NumberPair;
use passport_relay_core::SessionId;

use crate::orchestration::OrchestrationError;
use crate::orchestration::OrchestrationOutcome;

// ============================================================================
// SECTION: Attest And Publish
// ============================================================================

/// Runs the outgoing exchange for one originating call leg.
///
/// # Errors
///
/// Returns [`OrchestrationError`] when the channel, the engine, or the
/// publish exchange fails; an intentional engine disable is the
/// [`OrchestrationOutcome::Disabled`] success.
pub fn attest_and_publish(
    engine: &dyn AttestationEngine,
    exchange: &ExchangeClient,
    channel: &dyn CallChannel,
    profile: &str,
    pair: &NumberPair,
    session: &SessionId,
) -> Result<OrchestrationOutcome, OrchestrationError> {
    let existing_identity = channel.identity_header()?;
    let existing_date = channel.date_header()?;
    let dated = match (existing_identity, existing_date) {
        (Some(token), Some(date)) if !token.is_empty() && !date.is_empty() => {
            tracing::debug!("{session} reusing attestation headers from a prior hop");
            DatedToken::new(date, token)
        }
        _ => {
            let date = HeaderDate::now()?;
            let context = engine.create_context(channel, pair, profile)?;
            let mut context = match context {
                EngineOutcome::Ready(context) => context,
                EngineOutcome::Disabled => {
                    tracing::debug!("{session} attestation disabled for profile {profile}");
                    return Ok(OrchestrationOutcome::Disabled);
                }
            };
            let token = context.attest()?;
            DatedToken::new(date.into_string(), token)
        }
    };
    exchange.publish_token(pair, &dated, session)?;
    Ok(OrchestrationOutcome::Completed)
}
