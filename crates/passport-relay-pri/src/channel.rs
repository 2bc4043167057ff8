// crates/passport-relay-pri/src/channel.rs
// ============================================================================
// Module: Passport Relay Memory Call Channel
// Description: In-memory reference implementation of the call channel.
// Purpose: Back tests and embedding hosts without a live switch.
// Dependencies: passport-relay-core, std
// ============================================================================

//! ## Overview
//! [`MemoryCallChannel`] keeps the two header variables of one call leg in a
//! mutex-guarded slot pair. Production hosts adapt the switch's per-leg
//! variable store instead; this implementation demonstrates the required
//! locking discipline: the leg's exclusive lock is held only for the duration
//! of a single get or set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use passport_relay_core::CallChannel;
use passport_relay_core::ChannelError;

// ============================================================================
// SECTION: Memory Call Channel
// ============================================================================

/// Header values carried on one in-memory call leg.
#[derive(Debug, Default)]
struct HeaderSlots {
    /// Identity token slot (`SS_ID_HDR`).
    identity: Option<String>,
    /// Header date slot (`SS_DATE_HDR`).
    date: Option<String>,
}

/// Mutex-guarded in-memory call leg.
///
/// # Invariants
/// - The lock is held only for the duration of a single operation.
#[derive(Debug, Default)]
pub struct MemoryCallChannel {
    /// Guarded header slots for this leg.
    slots: Mutex<HeaderSlots>,
}

impl MemoryCallChannel {
    /// Creates a leg with no headers set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leg that already carries headers from a prior hop.
    #[must_use]
    pub fn with_headers(identity: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            slots: Mutex::new(HeaderSlots {
                identity: Some(identity.into()),
                date: Some(date.into()),
            }),
        }
    }
}

impl CallChannel for MemoryCallChannel {
    fn identity_header(&self) -> Result<Option<String>, ChannelError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| ChannelError::ReadFailed("channel lock poisoned".to_string()))?;
        Ok(slots.identity.clone())
    }

    fn date_header(&self) -> Result<Option<String>, ChannelError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| ChannelError::ReadFailed("channel lock poisoned".to_string()))?;
        Ok(slots.date.clone())
    }

    fn set_identity_header(&self, value: &str) -> Result<(), ChannelError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| ChannelError::WriteFailed("channel lock poisoned".to_string()))?;
        slots.identity = Some(value.to_string());
        Ok(())
    }

    fn set_date_header(&self, value: &str) -> Result<(), ChannelError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| ChannelError::WriteFailed("channel lock poisoned".to_string()))?;
        slots.date = Some(value.to_string());
        Ok(())
    }
}
