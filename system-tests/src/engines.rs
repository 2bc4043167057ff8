// system-tests/src/engines.rs
// ============================================================================
// Module: Scripted Engines
// Description: Deterministic attestation/verification engines for scenarios.
// Purpose: Stand in for the cryptographic engines at the interface boundary.
// Dependencies: passport-relay-core
// ============================================================================

//! ## Overview
//! The system suites exercise the exchange protocol, not token cryptography,
//! so the engines here are scripted at the same trait boundary the real
//! signing backend would implement: a fixed token on attest, recorded header
//! ingestion on verify, and switchable disabled/failure modes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use passport_relay_core::AttestationContext;
use passport_relay_core::AttestationEngine;
use passport_relay_core::CallChannel;
use passport_relay_core::EngineError;
use passport_relay_core::EngineOutcome;
use passport_relay_core::NumberPair;
use passport_relay_core::VerificationContext;
use passport_relay_core::VerificationEngine;

// ============================================================================
// SECTION: Scripted Attestation
// ============================================================================

/// Attestation engine producing a fixed token, or scripted to disable.
pub struct ScriptedAttestation {
    /// Token returned from every signing, or `None` to report disabled.
    token: Option<String>,
    /// Number of context creations observed.
    created: AtomicUsize,
}

impl ScriptedAttestation {
    /// Creates an engine that signs the given token.
    #[must_use]
    pub fn signing(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            created: AtomicUsize::new(0),
        }
    }

    /// Creates an engine that reports the profile as disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            token: None,
            created: AtomicUsize::new(0),
        }
    }

    /// Returns how many contexts were created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl AttestationEngine for ScriptedAttestation {
    fn create_context(
        &self,
        _channel: &dyn CallChannel,
        _pair: &NumberPair,
        _profile: &str,
    ) -> Result<EngineOutcome<Box<dyn AttestationContext>>, EngineError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.token.as_ref().map_or(Ok(EngineOutcome::Disabled), |token| {
            Ok(EngineOutcome::Ready(Box::new(ScriptedAttestationContext {
                token: token.clone(),
            })))
        })
    }
}

/// Context returning the scripted token.
struct ScriptedAttestationContext {
    /// Token to return from signing.
    token: String,
}

impl AttestationContext for ScriptedAttestationContext {
    fn attest(&mut self) -> Result<String, EngineError> {
        Ok(self.token.clone())
    }
}

// ============================================================================
// SECTION: Scripted Verification
// ============================================================================

/// Headers observed by the scripted verification engine.
#[derive(Debug, Default, Clone)]
pub struct ObservedHeaders {
    /// Identity token fed to the context.
    pub identity: Option<String>,
    /// Header date fed to the context.
    pub date: Option<String>,
    /// Whether verify ran.
    pub verified: bool,
}

/// Verification engine recording header ingestion.
pub struct ScriptedVerification {
    /// Whether context creation reports disabled.
    disabled: bool,
    /// Observed header state shared with contexts.
    observed: Arc<Mutex<ObservedHeaders>>,
}

impl ScriptedVerification {
    /// Creates an engine that accepts every token.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            disabled: false,
            observed: Arc::new(Mutex::new(ObservedHeaders::default())),
        }
    }

    /// Creates an engine that reports the profile as disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            observed: Arc::new(Mutex::new(ObservedHeaders::default())),
        }
    }

    /// Returns a snapshot of the observed headers.
    #[must_use]
    pub fn observed(&self) -> ObservedHeaders {
        self.observed.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl VerificationEngine for ScriptedVerification {
    fn create_context(
        &self,
        _channel: &dyn CallChannel,
        _source: &str,
        _profile: &str,
    ) -> Result<EngineOutcome<Box<dyn VerificationContext>>, EngineError> {
        if self.disabled {
            return Ok(EngineOutcome::Disabled);
        }
        Ok(EngineOutcome::Ready(Box::new(ScriptedVerificationContext {
            observed: Arc::clone(&self.observed),
        })))
    }
}

/// Context recording header ingestion into shared state.
struct ScriptedVerificationContext {
    /// Shared observation slot.
    observed: Arc<Mutex<ObservedHeaders>>,
}

impl ScriptedVerificationContext {
    /// Applies a mutation to the shared observation slot.
    fn record(&self, apply: impl FnOnce(&mut ObservedHeaders)) -> Result<(), EngineError> {
        let mut observed = self
            .observed
            .lock()
            .map_err(|_| EngineError::HeaderRejected("observation lock poisoned".to_string()))?;
        apply(&mut observed);
        Ok(())
    }
}

impl VerificationContext for ScriptedVerificationContext {
    fn add_identity_header(&mut self, token: &str) -> Result<(), EngineError> {
        self.record(|observed| observed.identity = Some(token.to_string()))
    }

    fn add_date_header(&mut self, date: &str) -> Result<(), EngineError> {
        self.record(|observed| observed.date = Some(date.to_string()))
    }

    fn verify(&mut self) -> Result<(), EngineError> {
        self.record(|observed| observed.verified = true)
    }
}
