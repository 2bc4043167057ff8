// crates/passport-relay-pri/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for passport-relay-pri tests.
// Purpose: Provide stub engines and a loopback broker for orchestrator tests.
// Dependencies: passport-relay-core, tiny_http, url
// ============================================================================

//! ## Overview
//! Provides scripted attestation/verification engines and a one-shot
//! loopback broker for orchestrator and entry-point tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output, panic-based assertions, and per-binary helper subsets are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use passport_relay_core::AttestationContext;
use passport_relay_core::AttestationEngine;
use passport_relay_core::CallChannel;
use passport_relay_core::EngineError;
use passport_relay_core::EngineOutcome;
use passport_relay_core::NumberPair;
use passport_relay_core::VerificationContext;
use passport_relay_core::VerificationEngine;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Loopback Broker
// ============================================================================

/// Captured request data returned by the loopback broker thread.
pub struct Captured {
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: String,
}

/// Serves exactly one request with the provided body and captures it.
pub fn serve_once(body: &str) -> (Url, std::thread::JoinHandle<Captured>) {
    let response = Response::from_string(body.to_string());
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let base = Url::parse(&format!("http://{addr}")).expect("base url");
    let handle = std::thread::spawn(move || {
        let mut request = server.recv().expect("request");
        let method = request.method().to_string();
        let path = request.url().to_string();
        let mut captured_body = String::new();
        request.as_reader().read_to_string(&mut captured_body).expect("read body");
        request.respond(response).expect("respond");
        Captured {
            method,
            path,
            body: captured_body,
        }
    });
    (base, handle)
}

/// Returns a base URL whose port is closed, for unreachable-broker tests.
pub fn unreachable_base() -> Url {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    Url::parse(&format!("http://127.0.0.1:{port}")).expect("base url")
}

// ============================================================================
// SECTION: Attestation Stubs
// ============================================================================

/// Scripted behavior for the stub attestation engine.
pub enum AttestMode {
    /// Produce this token.
    Token(String),
    /// Report the profile as disabled.
    Disabled,
    /// Fail context creation.
    FailCreate,
    /// Create a context whose signing step fails.
    FailSign,
}

/// Stub attestation engine counting context creations.
pub struct StubAttestationEngine {
    /// Scripted behavior.
    mode: AttestMode,
    /// Number of create_context invocations.
    pub created: Arc<AtomicUsize>,
}

impl StubAttestationEngine {
    /// Creates a stub with the given scripted behavior.
    pub fn new(mode: AttestMode) -> Self {
        Self {
            mode,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many contexts were created.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl AttestationEngine for StubAttestationEngine {
    fn create_context(
        &self,
        _channel: &dyn CallChannel,
        _pair: &NumberPair,
        _profile: &str,
    ) -> Result<EngineOutcome<Box<dyn AttestationContext>>, EngineError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            AttestMode::Token(token) => Ok(EngineOutcome::Ready(Box::new(StubAttestationContext {
                token: token.clone(),
            }))),
            AttestMode::Disabled => Ok(EngineOutcome::Disabled),
            AttestMode::FailCreate => {
                Err(EngineError::ContextCreation("stub refused".to_string()))
            }
            AttestMode::FailSign => Ok(EngineOutcome::Ready(Box::new(FailingAttestationContext))),
        }
    }
}

/// Context returning a scripted token.
struct StubAttestationContext {
    /// Token to return from signing.
    token: String,
}

impl AttestationContext for StubAttestationContext {
    fn attest(&mut self) -> Result<String, EngineError> {
        Ok(self.token.clone())
    }
}

/// Context whose signing step always fails.
struct FailingAttestationContext;

impl AttestationContext for FailingAttestationContext {
    fn attest(&mut self) -> Result<String, EngineError> {
        Err(EngineError::Attestation("stub signing failure".to_string()))
    }
}

// ============================================================================
// SECTION: Verification Stubs
// ============================================================================

/// Scripted behavior for the stub verification engine.
pub enum VerifyMode {
    /// Accept whatever headers arrive.
    Accept,
    /// Report the profile as disabled.
    Disabled,
    /// Fail context creation.
    FailCreate,
    /// Accept the headers but fail verification.
    Reject,
}

/// Headers observed by a verification context.
#[derive(Debug, Default, Clone)]
pub struct SeenHeaders {
    /// Identity tokens fed to the context.
    pub identity: Option<String>,
    /// Header dates fed to the context.
    pub date: Option<String>,
    /// Whether verify ran.
    pub verified: bool,
}

/// Stub verification engine recording the headers it was fed.
pub struct StubVerificationEngine {
    /// Scripted behavior.
    mode: VerifyMode,
    /// Headers observed by the last context.
    pub seen: Arc<Mutex<SeenHeaders>>,
}

impl StubVerificationEngine {
    /// Creates a stub with the given scripted behavior.
    pub fn new(mode: VerifyMode) -> Self {
        Self {
            mode,
            seen: Arc::new(Mutex::new(SeenHeaders::default())),
        }
    }

    /// Returns a snapshot of the observed headers.
    pub fn seen(&self) -> SeenHeaders {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl VerificationEngine for StubVerificationEngine {
    fn create_context(
        &self,
        _channel: &dyn CallChannel,
        _source: &str,
        _profile: &str,
    ) -> Result<EngineOutcome<Box<dyn VerificationContext>>, EngineError> {
        match self.mode {
            VerifyMode::Accept | VerifyMode::Reject => {
                Ok(EngineOutcome::Ready(Box::new(RecordingVerificationContext {
                    reject: matches!(self.mode, VerifyMode::Reject),
                    seen: Arc::clone(&self.seen),
                })))
            }
            VerifyMode::Disabled => Ok(EngineOutcome::Disabled),
            VerifyMode::FailCreate => {
                Err(EngineError::ContextCreation("stub refused".to_string()))
            }
        }
    }
}

/// Context recording fed headers into shared state.
struct RecordingVerificationContext {
    /// Whether verify should fail.
    reject: bool,
    /// Shared observation slot.
    seen: Arc<Mutex<SeenHeaders>>,
}

impl VerificationContext for RecordingVerificationContext {
    fn add_identity_header(&mut self, token: &str) -> Result<(), EngineError> {
        self.seen.lock().expect("seen lock").identity = Some(token.to_string());
        Ok(())
    }

    fn add_date_header(&mut self, date: &str) -> Result<(), EngineError> {
        self.seen.lock().expect("seen lock").date = Some(date.to_string());
        Ok(())
    }

    fn verify(&mut self) -> Result<(), EngineError> {
        self.seen.lock().expect("seen lock").verified = true;
        if self.reject {
            Err(EngineError::VerificationFailed("stub rejected token".to_string()))
        } else {
            Ok(())
        }
    }
}
