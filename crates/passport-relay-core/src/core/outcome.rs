// crates/passport-relay-core/src/core/outcome.rs
// ============================================================================
// Module: Passport Relay Outcomes
// Description: Tri-state entry-point result and two-outcome engine result.
// Purpose: Provide stable outcome enums shared across layers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entry points report one of three values: the exchange completed, the
//! feature is intentionally off, or the exchange failed. Engine context
//! creation reports one of two: a usable context or an intentional disable.
//! Disabled is always a distinguished success; call routing must never treat
//! it as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Response Code
// ============================================================================

/// Tri-state result returned by the request entry points.
///
/// # Invariants
/// - Variants are stable for programmatic handling by dialplan logic.
/// - `Disabled` and `Failed` must both leave call completion untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    /// The exchange ran to completion.
    Ok,
    /// The feature is intentionally off; nothing was attempted.
    Disabled,
    /// The exchange was attempted and failed; details are in the log.
    Failed,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Disabled => "DISABLED",
            Self::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

// ============================================================================
// SECTION: Engine Outcome
// ============================================================================

/// Two-outcome result of engine context creation.
///
/// Hard failures travel on the error channel of the surrounding `Result`;
/// this enum only distinguishes a usable context from an intentional
/// per-profile disable.
#[derive(Debug)]
pub enum EngineOutcome<T> {
    /// The engine produced a usable context.
    Ready(T),
    /// The engine is disabled for this profile; succeed trivially.
    Disabled,
}
