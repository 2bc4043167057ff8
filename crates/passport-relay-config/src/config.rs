// crates/passport-relay-config/src/config.rs
// ============================================================================
// Module: Passport Relay Configuration
// Description: Exchange configuration loading and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, serde_json, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a JSON file with strict size and path limits
//! and unknown fields rejected. When the feature flag is off the
//! conditionally-required fields may be absent and the loaded value behaves
//! like [`ExchangeConfig::disabled`]. When the flag is on, the profile name
//! and broker URL must be present and valid or loading fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "passport-relay.json";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "PASSPORT_RELAY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the attestation profile name.
pub const MAX_PROFILE_NAME_LENGTH: usize = 256;
/// Default broker request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3_000;
/// Minimum allowed broker request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum allowed broker request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// SECTION: Config Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem access failed.
    #[error("config io failure: {0}")]
    Io(String),
    /// The file parsed but a value violated a validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// The file could not be parsed as the expected JSON object.
    #[error("config parse failure: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Raw File Shape
// ============================================================================

/// JSON shape of the configuration file before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Feature flag gating the whole exchange.
    #[serde(default)]
    pri_stir_shaken_enable: bool,
    /// Attestation/verification profile name; required when enabled.
    #[serde(default)]
    pri_stir_shaken_profile_name: Option<String>,
    /// Broker base URL; required when enabled.
    #[serde(default)]
    oob_proxy_url: Option<String>,
    /// Broker request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    oob_request_timeout_ms: u64,
    /// Single-character delimiter joining date and token on the wire.
    #[serde(default = "default_delimiter")]
    oob_passport_delimiter: String,
}

/// Serde default for the request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Serde default for the passport delimiter.
fn default_delimiter() -> String {
    "&".to_string()
}

// ============================================================================
// SECTION: Exchange Configuration
// ============================================================================

/// Validated process-wide exchange configuration.
///
/// # Invariants
/// - Immutable after construction; reload is construct-new-and-swap.
/// - When `is_enabled` returns true, `profile_name` is non-empty and
///   `broker_url` is `Some` with a validated http(s) URL.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Feature flag gating the whole exchange.
    enable: bool,
    /// Attestation/verification profile name.
    profile_name: String,
    /// Validated broker base URL, trailing slashes trimmed.
    broker_url: Option<Url>,
    /// Full-lifecycle broker request timeout.
    request_timeout: Duration,
    /// Delimiter byte joining date and token on the wire.
    delimiter: u8,
}

impl ExchangeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path` argument, the `PASSPORT_RELAY_CONFIG`
    /// environment variable, then `passport-relay.json` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_json(content)
    }

    /// Parses and validates configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::validate(raw)
    }

    /// Returns the configuration of a switch with the feature off.
    ///
    /// Hosts fall back to this value when loading fails so call routing
    /// degrades gracefully instead of aborting registration.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable: false,
            profile_name: String::new(),
            broker_url: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            delimiter: b'&',
        }
    }

    /// Returns true when the exchange feature is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enable
    }

    /// Returns the attestation/verification profile name.
    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Returns the validated broker base URL, when configured.
    #[must_use]
    pub fn broker_url(&self) -> Option<&Url> {
        self.broker_url.as_ref()
    }

    /// Returns the full-lifecycle broker request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the delimiter byte joining date and token on the wire.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Validates the raw file shape into a usable configuration.
    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.oob_request_timeout_ms < MIN_REQUEST_TIMEOUT_MS
            || raw.oob_request_timeout_ms > MAX_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "oob_request_timeout_ms must be within [{MIN_REQUEST_TIMEOUT_MS}, \
                 {MAX_REQUEST_TIMEOUT_MS}]"
            )));
        }
        let delimiter = validate_delimiter(&raw.oob_passport_delimiter)?;
        let profile_name = match raw.pri_stir_shaken_profile_name {
            Some(name) => validate_profile_name(&name)?,
            None if raw.pri_stir_shaken_enable => {
                return Err(ConfigError::Invalid(
                    "pri_stir_shaken_profile_name is required when enabled".to_string(),
                ));
            }
            None => String::new(),
        };
        let broker_url = match raw.oob_proxy_url {
            Some(url) => Some(validate_broker_url(&url)?),
            None if raw.pri_stir_shaken_enable => {
                return Err(ConfigError::Invalid(
                    "oob_proxy_url is required when enabled".to_string(),
                ));
            }
            None => None,
        };
        Ok(Self {
            enable: raw.pri_stir_shaken_enable,
            profile_name,
            broker_url,
            request_timeout: Duration::from_millis(raw.oob_request_timeout_ms),
            delimiter,
        })
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Resolves the effective config path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(
        || {
            env::var_os(CONFIG_ENV_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

/// Enforces path length guards before touching the filesystem.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates the profile name length and shape.
fn validate_profile_name(name: &str) -> Result<String, ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(
            "pri_stir_shaken_profile_name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_PROFILE_NAME_LENGTH {
        return Err(ConfigError::Invalid(
            "pri_stir_shaken_profile_name exceeds max length".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Validates the broker base URL and trims trailing slashes.
fn validate_broker_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| ConfigError::Invalid(format!("oob_proxy_url is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::Invalid(format!(
                "oob_proxy_url scheme {scheme} is not supported"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("oob_proxy_url requires a host".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(
            "oob_proxy_url must not embed credentials".to_string(),
        ));
    }
    Ok(url)
}

/// Validates the delimiter is one ASCII byte that cannot appear in a date.
fn validate_delimiter(raw: &str) -> Result<u8, ConfigError> {
    // A one-byte UTF-8 string is necessarily ASCII.
    let &[byte] = raw.as_bytes() else {
        return Err(ConfigError::Invalid(
            "oob_passport_delimiter must be a single ascii character".to_string(),
        ));
    };
    if byte.is_ascii_alphanumeric() || matches!(byte, b',' | b' ' | b':') {
        return Err(ConfigError::Invalid(
            "oob_passport_delimiter collides with header date characters".to_string(),
        ));
    }
    Ok(byte)
}
