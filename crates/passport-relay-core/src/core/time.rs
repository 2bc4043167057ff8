// crates/passport-relay-core/src/core/time.rs
// ============================================================================
// Module: Passport Relay Header Date
// Description: RFC 1123 GMT wall-clock stamp for attestation binding.
// Purpose: Produce the fixed-format date value published with each token.
// Dependencies: time
// ============================================================================

//! ## Overview
//! The attestation engine binds each token to a wall-clock date in the
//! RFC 1123 fixed shape used by signaling headers, always rendered in GMT:
//! `Mon, 01 Jan 2024 00:00:00 GMT`. The terminating side treats the value as
//! opaque and relays whatever the broker stored; only the originating side
//! stamps new dates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// RFC 1123 fixed-date layout, rendered with a literal GMT zone.
const IMF_FIXDATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

// ============================================================================
// SECTION: Header Date Errors
// ============================================================================

/// Errors raised when stamping a header date.
#[derive(Debug, Error)]
pub enum HeaderDateError {
    /// The wall clock could not be rendered into the fixed layout.
    #[error("header date format failed: {0}")]
    Format(String),
}

// ============================================================================
// SECTION: Header Date
// ============================================================================

/// Fixed-format GMT date value bound to an attestation.
///
/// # Invariants
/// - The rendered form always fits the dated-token date budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDate(String);

impl HeaderDate {
    /// Stamps the current wall-clock time in GMT.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderDateError`] when formatting fails.
    pub fn now() -> Result<Self, HeaderDateError> {
        Self::from_instant(OffsetDateTime::now_utc())
    }

    /// Renders a specific instant; exposed for deterministic tests.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderDateError`] when formatting fails.
    pub fn from_instant(instant: OffsetDateTime) -> Result<Self, HeaderDateError> {
        instant
            .to_offset(time::UtcOffset::UTC)
            .format(IMF_FIXDATE)
            .map(Self)
            .map_err(|err| HeaderDateError::Format(err.to_string()))
    }

    /// Returns the date as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the stamp and returns the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HeaderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
