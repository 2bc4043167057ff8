// crates/passport-relay-pri/src/request.rs
// ============================================================================
// Module: Passport Relay Request Entry Points
// Description: PRI-facing entry points over the two orchestrators.
// Purpose: Apply the enable gate, derive sessions, and map outcomes.
// Dependencies: passport-relay-broker, passport-relay-config, passport-relay-core
// ============================================================================

//! ## Overview
//! [`PriExchange`] owns the process-wide wiring: the immutable
//! [`ExchangeConfig`], the exchange client built from it, and the two
//! engines shared behind [`Arc`]. The entry points are total functions into
//! [`ResponseCode`]: the feature gate short-circuits to `Disabled` with no
//! network touch, engine disables map to `Ok` (a distinguished trivial
//! success), and every failure maps to `Failed` after one session-tagged log
//! event. Call routing on `Failed` is the dialplan's decision; this layer
//! never blocks call completion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use passport_relay_broker::ExchangeClient;
use passport_relay_broker::ExchangeError;
use passport_relay_config::ExchangeConfig;
use passport_relay_core::AttestationEngine;
use passport_relay_core::CallChannel;
use passport_relay_core::NumberPair;
use passport_relay_core::ResponseCode;
use passport_relay_core::SessionId;
use passport_relay_core::VerificationEngine;

use crate::orchestration::OrchestrationOutcome;
use crate::orchestration::incoming::fetch_and_verify;
use crate::orchestration::outgoing::attest_and_publish;

// ============================================================================
// SECTION: PRI Exchange
// ============================================================================

/// Process-wide wiring for the PRI out-of-band exchange.
///
/// # Invariants
/// - Immutable after construction; a config reload builds a new value and
///   the host swaps it atomically.
/// - Shared across concurrent call-setup threads; all per-call state is
///   stack-local.
pub struct PriExchange {
    /// Immutable process-wide configuration.
    config: ExchangeConfig,
    /// Exchange client; present only when the feature is enabled.
    exchange: Option<ExchangeClient>,
    /// Attestation engine for originating legs.
    attestation: Arc<dyn AttestationEngine>,
    /// Verification engine for terminating legs.
    verification: Arc<dyn VerificationEngine>,
}

impl PriExchange {
    /// Wires the exchange from configuration and the two engines.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] when the feature is enabled and the exchange
    /// client cannot be built from the configured broker URL.
    pub fn new(
        config: ExchangeConfig,
        attestation: Arc<dyn AttestationEngine>,
        verification: Arc<dyn VerificationEngine>,
    ) -> Result<Self, ExchangeError> {
        let exchange = match (config.is_enabled(), config.broker_url()) {
            (true, Some(base)) => Some(ExchangeClient::new(
                base.clone(),
                config.delimiter(),
                config.request_timeout(),
            )?),
            _ => None,
        };
        Ok(Self {
            config,
            exchange,
            attestation,
            verification,
        })
    }

    /// Handles call origination: attest (or reuse) and publish.
    ///
    /// The destination is derived from the raw dial string by stripping any
    /// routing prefix through the last `/`.
    pub fn outgoing_request(
        &self,
        source: &str,
        raw_destination: &str,
        channel: &dyn CallChannel,
    ) -> ResponseCode {
        if !self.config.is_enabled() {
            return ResponseCode::Disabled;
        }
        let pair = NumberPair::from_dial_string(source, raw_destination);
        let session = SessionId::for_pri(&pair);
        let Some(exchange) = self.exchange.as_ref() else {
            tracing::warn!("{session} exchange client unavailable");
            return ResponseCode::Failed;
        };
        let result = attest_and_publish(
            self.attestation.as_ref(),
            exchange,
            channel,
            self.config.profile_name(),
            &pair,
            &session,
        );
        match result {
            Ok(OrchestrationOutcome::Completed) => {
                tracing::debug!("{session} outgoing exchange completed");
                ResponseCode::Ok
            }
            Ok(OrchestrationOutcome::Disabled) => ResponseCode::Ok,
            Err(err) => {
                tracing::warn!("{session} outgoing exchange failed: {err}");
                ResponseCode::Failed
            }
        }
    }

    /// Handles call termination: fetch, restore headers, and verify.
    pub fn incoming_request(
        &self,
        source: &str,
        destination: &str,
        channel: &dyn CallChannel,
    ) -> ResponseCode {
        if !self.config.is_enabled() {
            return ResponseCode::Disabled;
        }
        let pair = NumberPair::new(source, destination);
        let session = SessionId::for_pri(&pair);
        let Some(exchange) = self.exchange.as_ref() else {
            tracing::warn!("{session} exchange client unavailable");
            return ResponseCode::Failed;
        };
        let result = fetch_and_verify(
            self.verification.as_ref(),
            exchange,
            channel,
            self.config.profile_name(),
            &pair,
            &session,
        );
        match result {
            Ok(OrchestrationOutcome::Completed) => {
                tracing::debug!("{session} incoming exchange completed");
                ResponseCode::Ok
            }
            Ok(OrchestrationOutcome::Disabled) => ResponseCode::Ok,
            Err(err) => {
                tracing::warn!("{session} incoming exchange failed: {err}");
                ResponseCode::Failed
            }
        }
    }
}
