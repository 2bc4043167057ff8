// crates/passport-relay-core/src/core/dated_token.rs
// ============================================================================
// Module: Passport Relay Dated Token
// Description: Delimited (date, token) composite exchanged with the broker.
// Purpose: Validated serialization and parsing around a single delimiter byte.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`DatedToken`] pairs a signed PASSporT bearer string with the header
//! date it was bound to. On the wire toward the broker the pair travels as a
//! single string, `date || delimiter || token`.
//! Invariants:
//! - Neither field contains the delimiter byte.
//! - `date` is at most [`MAX_DATE_LENGTH`] bytes, `token` at most
//!   [`MAX_TOKEN_LENGTH`] bytes.
//! - Oversized or delimiter-bearing input is rejected, never truncated.
//! - Parsing splits at the first delimiter occurrence; a missing delimiter is
//!   the distinguished [`DatedTokenError::MissingDelimiter`] error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Delimiter byte separating date and token unless configured otherwise.
pub const DEFAULT_DELIMITER: u8 = b'&';
/// Maximum length of the date field in bytes.
pub const MAX_DATE_LENGTH: usize = 64;
/// Maximum length of the token field in bytes.
pub const MAX_TOKEN_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Dated Token Errors
// ============================================================================

/// Errors raised by dated-token serialization and parsing.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatedTokenError {
    /// Serialized input had no delimiter byte; no token can be recovered.
    #[error("dated token has no delimiter")]
    MissingDelimiter,
    /// The configured delimiter is not a single ASCII byte.
    #[error("delimiter {0:#04x} is not ascii")]
    NonAsciiDelimiter(u8),
    /// A field contained the delimiter byte and cannot round-trip.
    #[error("{field} contains the delimiter byte")]
    DelimiterInField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A field exceeded its length budget.
    #[error("{field} length {actual} exceeds limit {limit}")]
    Oversized {
        /// Name of the offending field.
        field: &'static str,
        /// Hard length limit in bytes.
        limit: usize,
        /// Observed length in bytes.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Dated Token
// ============================================================================

/// A signed attestation token together with the date it was bound to.
///
/// # Invariants
/// - Constructed transiently per call leg; never persisted by this system.
/// - Field contents are validated at serialization and parsing boundaries,
///   not at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedToken {
    /// Header date the token was attested under.
    date: String,
    /// Opaque signed bearer token.
    token: String,
}

impl DatedToken {
    /// Creates a dated token from its two fields.
    #[must_use]
    pub fn new(date: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            token: token.into(),
        }
    }

    /// Returns the date field.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the token field.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Serializes the pair as `date || delimiter || token`.
    ///
    /// # Errors
    ///
    /// Returns [`DatedTokenError`] when either field contains the delimiter
    /// or exceeds its length budget. Nothing is truncated.
    pub fn serialize(&self, delimiter: u8) -> Result<String, DatedTokenError> {
        validate_delimiter(delimiter)?;
        validate_field("date", &self.date, MAX_DATE_LENGTH, delimiter)?;
        validate_field("token", &self.token, MAX_TOKEN_LENGTH, delimiter)?;
        let mut wire = String::with_capacity(self.date.len() + 1 + self.token.len());
        wire.push_str(&self.date);
        wire.push(char::from(delimiter));
        wire.push_str(&self.token);
        Ok(wire)
    }

    /// Parses a delimited string back into its date and token fields.
    ///
    /// The split happens at the first occurrence of the delimiter; the token
    /// side may legally contain further delimiter bytes only if the producer
    /// violated its own invariant, so the remainder is taken whole.
    ///
    /// # Errors
    ///
    /// Returns [`DatedTokenError::MissingDelimiter`] when the delimiter is
    /// absent and [`DatedTokenError::Oversized`] when a recovered field
    /// exceeds its budget.
    pub fn parse(wire: &str, delimiter: u8) -> Result<Self, DatedTokenError> {
        validate_delimiter(delimiter)?;
        let index = wire
            .as_bytes()
            .iter()
            .position(|byte| *byte == delimiter)
            .ok_or(DatedTokenError::MissingDelimiter)?;
        let date = &wire[.. index];
        let token = &wire[index + 1 ..];
        if date.len() > MAX_DATE_LENGTH {
            return Err(DatedTokenError::Oversized {
                field: "date",
                limit: MAX_DATE_LENGTH,
                actual: date.len(),
            });
        }
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(DatedTokenError::Oversized {
                field: "token",
                limit: MAX_TOKEN_LENGTH,
                actual: token.len(),
            });
        }
        Ok(Self {
            date: date.to_string(),
            token: token.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects delimiters that could split inside a multi-byte character.
const fn validate_delimiter(delimiter: u8) -> Result<(), DatedTokenError> {
    if delimiter.is_ascii() {
        Ok(())
    } else {
        Err(DatedTokenError::NonAsciiDelimiter(delimiter))
    }
}

/// Validates one field against the delimiter and length invariants.
fn validate_field(
    field: &'static str,
    value: &str,
    limit: usize,
    delimiter: u8,
) -> Result<(), DatedTokenError> {
    if value.len() > limit {
        return Err(DatedTokenError::Oversized {
            field,
            limit,
            actual: value.len(),
        });
    }
    if value.as_bytes().contains(&delimiter) {
        return Err(DatedTokenError::DelimiterInField {
            field,
        });
    }
    Ok(())
}
