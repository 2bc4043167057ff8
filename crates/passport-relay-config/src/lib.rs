// crates/passport-relay-config/src/lib.rs
// ============================================================================
// Module: Passport Relay Config Library
// Description: Configuration loading and validation for Passport Relay.
// Purpose: Provide strict, fail-closed config parsing for the exchange.
// Dependencies: serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! Passport Relay Config loads the process-wide [`ExchangeConfig`] from a
//! JSON file with strict size and path limits. The value is immutable for the
//! lifetime of the process; a reload constructs a new value and swaps it in
//! on the host side. Missing or invalid configuration fails closed so the
//! feature stays effectively disabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DEFAULT_REQUEST_TIMEOUT_MS;
pub use config::ExchangeConfig;
pub use config::MAX_PROFILE_NAME_LENGTH;
