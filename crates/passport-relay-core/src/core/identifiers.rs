// crates/passport-relay-core/src/core/identifiers.rs
// ============================================================================
// Module: Passport Relay Identifiers
// Description: Call-leg identifiers for broker lookup and log correlation.
// Purpose: Provide strongly typed number pairs and session identifiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A call leg is identified toward the broker by its [`NumberPair`] and in
//! logs by its [`SessionId`]. Both are opaque strings on the wire. The
//! destination number in a raw dial string may carry a technology routing
//! prefix (`PJSIP/+15551234567`); derivation strips everything through the
//! last path separator before the subscriber number is used for lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Number Pair
// ============================================================================

/// Source and destination subscriber numbers identifying one call leg.
///
/// # Invariants
/// - Numbers are opaque UTF-8 strings; no dial-plan normalization is applied
///   beyond routing-prefix stripping at construction.
/// - The pair is the broker storage key; both sides of a call must derive the
///   same pair for the exchange to meet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberPair {
    /// Originating subscriber number.
    source: String,
    /// Terminating subscriber number, routing prefix removed.
    destination: String,
}

impl NumberPair {
    /// Creates a pair from already-derived subscriber numbers.
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Creates a pair from a raw dial string, stripping any routing prefix.
    ///
    /// The destination keeps everything after the last `/`; a dial string
    /// without a separator is used whole.
    #[must_use]
    pub fn from_dial_string(source: impl Into<String>, raw_destination: &str) -> Self {
        let destination =
            raw_destination.rsplit_once('/').map_or(raw_destination, |(_, tail)| tail);
        Self {
            source: source.into(),
            destination: destination.to_string(),
        }
    }

    /// Returns the originating number.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the terminating number.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl fmt::Display for NumberPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.destination)
    }
}

// ============================================================================
// SECTION: Session Identifier
// ============================================================================

/// Ephemeral log-correlation identifier for one entry-point invocation.
///
/// # Invariants
/// - Carries no state and is never stored beyond the invocation.
/// - The wire form is `PRI_<src>_<dst>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Builds the session identifier for a PRI call leg.
    #[must_use]
    pub fn for_pri(pair: &NumberPair) -> Self {
        Self(format!("PRI_{}_{}", pair.source(), pair.destination()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
