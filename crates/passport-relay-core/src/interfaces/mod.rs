// crates/passport-relay-core/src/interfaces/mod.rs
// ============================================================================
// Module: Passport Relay Interfaces
// Description: Backend-agnostic contracts for engines and the call channel.
// Purpose: Define the surfaces the orchestrators are written against.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The exchange composes three external collaborators: an attestation engine
//! that signs fresh PASSporTs, a verification engine that validates retrieved
//! ones, and the call leg's side-channel variable store. All three are
//! consumed through the traits below so the orchestrators stay independent of
//! any particular switch or signing backend.
//! Invariants:
//! - Implementations fail closed: a context that cannot be created reports an
//!   error or a disable, never a silently unusable value.
//! - Channel implementations hold the call leg's exclusive lock only for the
//!   duration of a single get or set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::NumberPair;
use crate::core::outcome::EngineOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Side-channel variable carrying the identity token on the call leg.
pub const IDENTITY_HEADER_VAR: &str = "SS_ID_HDR";
/// Side-channel variable carrying the header date on the call leg.
pub const DATE_HEADER_VAR: &str = "SS_DATE_HDR";

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Hard failures reported by the attestation and verification engines.
///
/// Intentional disables are not errors; they travel through
/// [`EngineOutcome::Disabled`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Context creation was attempted and failed.
    #[error("context creation failed: {0}")]
    ContextCreation(String),
    /// Token signing failed.
    #[error("attestation failed: {0}")]
    Attestation(String),
    /// The engine rejected an identity or date header value.
    #[error("header rejected: {0}")]
    HeaderRejected(String),
    /// Verification ran and did not validate the token.
    #[error("verification failed: {0}")]
    VerificationFailed(String),
}

// ============================================================================
// SECTION: Channel Errors
// ============================================================================

/// Failures reported by the call leg's side-channel store.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A variable could not be read.
    #[error("channel read failed: {0}")]
    ReadFailed(String),
    /// A variable could not be written.
    #[error("channel write failed: {0}")]
    WriteFailed(String),
}

// ============================================================================
// SECTION: Call Channel
// ============================================================================

/// Typed access to one call leg's side-channel variables.
///
/// Narrow interface over the two documented variables
/// ([`IDENTITY_HEADER_VAR`] and [`DATE_HEADER_VAR`]); host adapters map these
/// onto the switch's per-leg key/value store and are responsible for making
/// writes inheritable by downstream signaling.
pub trait CallChannel: Send + Sync {
    /// Reads the identity token carried on the leg, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the store cannot be read.
    fn identity_header(&self) -> Result<Option<String>, ChannelError>;

    /// Reads the header date carried on the leg, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the store cannot be read.
    fn date_header(&self) -> Result<Option<String>, ChannelError>;

    /// Writes the identity token onto the leg.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the store cannot be written.
    fn set_identity_header(&self, value: &str) -> Result<(), ChannelError>;

    /// Writes the header date onto the leg.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the store cannot be written.
    fn set_date_header(&self, value: &str) -> Result<(), ChannelError>;
}

// ============================================================================
// SECTION: Attestation Engine
// ============================================================================

/// Produces signed PASSporTs for originating call legs.
pub trait AttestationEngine: Send + Sync {
    /// Creates an attestation context for one call leg.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when creation is attempted and fails;
    /// intentional disables return [`EngineOutcome::Disabled`].
    fn create_context(
        &self,
        channel: &dyn CallChannel,
        pair: &NumberPair,
        profile: &str,
    ) -> Result<EngineOutcome<Box<dyn AttestationContext>>, EngineError>;
}

/// One call leg's in-flight attestation.
pub trait AttestationContext {
    /// Signs and returns the opaque bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when signing fails.
    fn attest(&mut self) -> Result<String, EngineError>;
}

// ============================================================================
// SECTION: Verification Engine
// ============================================================================

/// Validates retrieved PASSporTs for terminating call legs.
pub trait VerificationEngine: Send + Sync {
    /// Creates a verification context for one call leg.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when creation is attempted and fails;
    /// intentional disables return [`EngineOutcome::Disabled`].
    fn create_context(
        &self,
        channel: &dyn CallChannel,
        source: &str,
        profile: &str,
    ) -> Result<EngineOutcome<Box<dyn VerificationContext>>, EngineError>;
}

/// One call leg's in-flight verification.
///
/// The three steps fail independently; callers must treat any error as a
/// failed verification and report it without affecting call treatment.
pub trait VerificationContext {
    /// Feeds the retrieved identity token into the context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the value is rejected.
    fn add_identity_header(&mut self, token: &str) -> Result<(), EngineError>;

    /// Feeds the retrieved header date into the context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the value is rejected.
    fn add_date_header(&mut self, date: &str) -> Result<(), EngineError>;

    /// Runs verification over the ingested headers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the token does not validate.
    fn verify(&mut self) -> Result<(), EngineError>;
}
