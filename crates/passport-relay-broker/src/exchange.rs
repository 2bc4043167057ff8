// crates/passport-relay-broker/src/exchange.rs
// ============================================================================
// Module: Passport Relay Exchange Client
// Description: Fetch and publish operations composing transport and codec.
// Purpose: Move dated tokens between a call leg and the broker.
// Dependencies: passport-relay-core, tracing, url
// ============================================================================

//! ## Overview
//! [`ExchangeClient`] owns the broker base URL, the delimiter, and the
//! transport client, and exposes the two exchange operations: publish a dated
//! token under a number pair and fetch the dated token stored for one.
//! Invariants:
//! - Endpoint paths are built with percent-encoded segments, never string
//!   concatenation.
//! - A retrieve body whose token string carries no delimiter is the
//!   distinguished [`ExchangeError::TokenUnavailable`]; there is exactly one
//!   failure channel.
//! - Every failure is logged once with the session identifier before it
//!   propagates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use passport_relay_core::DatedToken;
use passport_relay_core::DatedTokenError;
use passport_relay_core::NumberPair;
use passport_relay_core::SessionId;
use thiserror::Error;
use url::Url;

use crate::codec;
use crate::codec::CodecError;
use crate::transport::TransportClient;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Exchange Errors
// ============================================================================

/// Errors raised by the exchange operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The network round trip failed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// The broker body was malformed or the publish was rejected.
    #[error("protocol failure: {0}")]
    Protocol(#[from] CodecError),
    /// The broker held no usable token for the number pair.
    #[error("no valid token retrieved")]
    TokenUnavailable,
    /// A dated token violated its size or delimiter invariants.
    #[error("dated token invalid: {0}")]
    InvalidToken(DatedTokenError),
    /// The base URL cannot carry additional path segments.
    #[error("endpoint build failed: {0}")]
    EndpointBuild(String),
}

// ============================================================================
// SECTION: Exchange Client
// ============================================================================

/// Client side of the out-of-band token exchange.
///
/// # Invariants
/// - Shared read-only across concurrent call legs; all per-call state is
///   stack-local.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    /// Bounded transport used for every round trip.
    transport: TransportClient,
    /// Validated broker base URL.
    base_url: Url,
    /// Delimiter byte joining date and token on the wire.
    delimiter: u8,
}

impl ExchangeClient {
    /// Builds an exchange client for the given broker.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] when the transport client cannot be built or
    /// the base URL cannot carry path segments.
    pub fn new(base_url: Url, delimiter: u8, timeout: Duration) -> Result<Self, ExchangeError> {
        if base_url.cannot_be_a_base() {
            return Err(ExchangeError::EndpointBuild(format!(
                "base url {base_url} cannot carry path segments"
            )));
        }
        let transport = TransportClient::new(timeout)?;
        Ok(Self {
            transport,
            base_url,
            delimiter,
        })
    }

    /// Fetches the dated token stored for a number pair.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::TokenUnavailable`] when the broker has no
    /// usable token for the pair and other variants for transport, protocol,
    /// or token-shape failures.
    pub fn fetch_token(
        &self,
        pair: &NumberPair,
        session: &SessionId,
    ) -> Result<DatedToken, ExchangeError> {
        let url = self.endpoint(&["retrieve", pair.source(), pair.destination()])?;
        let body = self.transport.get(&url).map_err(|err| {
            tracing::warn!("{session} retrieve transport failure: {err}");
            ExchangeError::Transport(err)
        })?;
        let wire = codec::decode_fetch(&body).map_err(|err| {
            tracing::warn!("{session} retrieve protocol failure: {err}");
            ExchangeError::Protocol(err)
        })?;
        match DatedToken::parse(&wire, self.delimiter) {
            Ok(dated) => {
                tracing::debug!("{session} retrieved dated token for {pair}");
                Ok(dated)
            }
            Err(DatedTokenError::MissingDelimiter) => {
                tracing::warn!("{session} broker returned token without delimiter");
                Err(ExchangeError::TokenUnavailable)
            }
            Err(err) => {
                tracing::warn!("{session} retrieved token invalid: {err}");
                Err(ExchangeError::InvalidToken(err))
            }
        }
    }

    /// Publishes a dated token under a number pair.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] when serialization, the round trip, or the
    /// broker ack fails.
    pub fn publish_token(
        &self,
        pair: &NumberPair,
        dated: &DatedToken,
        session: &SessionId,
    ) -> Result<(), ExchangeError> {
        let passport = dated.serialize(self.delimiter).map_err(|err| {
            tracing::warn!("{session} dated token rejected before publish: {err}");
            ExchangeError::InvalidToken(err)
        })?;
        let body = codec::encode_publish(pair, &passport)?;
        let url = self.endpoint(&["publish"])?;
        let response = self.transport.post_json(&url, body).map_err(|err| {
            tracing::warn!("{session} publish transport failure: {err}");
            ExchangeError::Transport(err)
        })?;
        codec::decode_publish_ack(&response).map_err(|err| {
            tracing::warn!("{session} publish not acknowledged: {err}");
            ExchangeError::Protocol(err)
        })?;
        tracing::debug!("{session} published dated token for {pair}");
        Ok(())
    }

    /// Probes the broker health endpoint; informational only.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] when the broker is unreachable or does not
    /// acknowledge.
    pub fn probe(&self, session: &SessionId) -> Result<(), ExchangeError> {
        let url = self.endpoint(&["health"])?;
        let body = self.transport.get(&url).map_err(|err| {
            tracing::warn!("{session} broker health probe transport failure: {err}");
            ExchangeError::Transport(err)
        })?;
        codec::decode_publish_ack(&body).map_err(|err| {
            tracing::warn!("{session} broker health probe failed: {err}");
            ExchangeError::Protocol(err)
        })
    }

    /// Builds an endpoint URL by appending percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ExchangeError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ExchangeError::EndpointBuild("base url cannot carry path segments".to_string())
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }
}
