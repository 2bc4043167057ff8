// crates/passport-relay-broker/src/transport.rs
// ============================================================================
// Module: Passport Relay Transport Client
// Description: Bounded blocking HTTP client for broker round trips.
// Purpose: Perform one request with timeout, no redirects, capped body reads.
// Dependencies: reqwest, url
// ============================================================================

//! ## Overview
//! [`TransportClient`] performs exactly one HTTP round trip per call on the
//! call-setup thread. PRI call setup is latency-sensitive, so the full
//! request lifecycle is bounded by the configured timeout and a slow or
//! unreachable broker surfaces as a transport error instead of a stall.
//! Invariants:
//! - Redirects are rejected, never followed.
//! - Response bodies accumulate incrementally and are capped at
//!   [`MAX_RESPONSE_BYTES`].
//! - Transport failures (connect, DNS, TLS, timeout, non-2xx) are
//!   distinguished from protocol failures, which belong to the codec layer.
//! - No retries at this layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hard cap on broker response bodies in bytes.
///
/// Covers the 4 KiB token budget plus broker framing with wide margin.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors raised by the transport layer.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
    /// The request failed before a response arrived (connect, DNS, TLS,
    /// timeout).
    #[error("http request failed: {0}")]
    Request(String),
    /// The broker answered with a redirect; responses must be final.
    #[error("redirected from {from} to {to}")]
    Redirected {
        /// Requested URL.
        from: String,
        /// Location the broker redirected toward.
        to: String,
    },
    /// The broker answered with a non-success status.
    #[error("http status {0}")]
    Status(u16),
    /// The response body exceeded [`MAX_RESPONSE_BYTES`].
    #[error("http response exceeds size limit of {limit} bytes")]
    TooLarge {
        /// Hard response size limit in bytes.
        limit: usize,
    },
    /// The response body could not be read to completion.
    #[error("failed to read response: {0}")]
    Read(String),
}

// ============================================================================
// SECTION: Transport Client
// ============================================================================

/// Bounded blocking HTTP client used for every broker exchange.
///
/// # Invariants
/// - The timeout applies to the full request lifecycle.
/// - One instance is shared across call legs; per-request state lives on the
///   stack of the calling thread.
#[derive(Debug, Clone)]
pub struct TransportClient {
    /// Underlying HTTP client with timeout and redirect policy applied.
    client: Client,
}

impl TransportClient {
    /// Builds a transport client with the given full-lifecycle timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
        })
    }

    /// Performs a GET request and returns the capped response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any transport-level failure.
    pub fn get(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.execute(self.client.get(url.as_str()), url)
    }

    /// Performs a JSON POST request and returns the capped response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any transport-level failure.
    pub fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let request =
            self.client.post(url.as_str()).header(CONTENT_TYPE, "application/json").body(body);
        self.execute(request, url)
    }

    /// Sends one request and accumulates its body under the size cap.
    fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = request.send().map_err(|err| TransportError::Request(err.to_string()))?;
        if response.url() != url {
            return Err(TransportError::Redirected {
                from: url.to_string(),
                to: response.url().to_string(),
            });
        }
        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("<missing location>")
                .to_string();
            return Err(TransportError::Redirected {
                from: url.to_string(),
                to: location,
            });
        }
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        read_response_limited(response)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the response body incrementally while enforcing the byte cap.
fn read_response_limited(response: Response) -> Result<Vec<u8>, TransportError> {
    let max_bytes = u64::try_from(MAX_RESPONSE_BYTES).map_err(|_| TransportError::TooLarge {
        limit: MAX_RESPONSE_BYTES,
    })?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes
    {
        return Err(TransportError::TooLarge {
            limit: MAX_RESPONSE_BYTES,
        });
    }
    let limit = max_bytes.saturating_add(1);
    let mut buf = Vec::new();
    let mut handle = response.take(limit);
    handle.read_to_end(&mut buf).map_err(|err| TransportError::Read(err.to_string()))?;
    if buf.len() > MAX_RESPONSE_BYTES {
        return Err(TransportError::TooLarge {
            limit: MAX_RESPONSE_BYTES,
        });
    }
    Ok(buf)
}
