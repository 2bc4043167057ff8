// system-tests/src/harness.rs
// ============================================================================
// Module: Loopback Broker Harness
// Description: In-process HTTP broker backed by an in-memory record store.
// Purpose: Serve the publish/retrieve/health surface for end-to-end tests.
// Dependencies: serde_json, tiny_http, url
// ============================================================================

//! ## Overview
//! [`LoopbackBroker`] binds an ephemeral loopback port and serves the broker
//! HTTP surface until dropped: `POST /publish` upserts a dated-token record
//! keyed by number pair, `GET /retrieve/{src}/{dst}` looks one up, and
//! `GET /health` acknowledges. Records can be seeded and inspected directly
//! so tests can stage and assert broker state without extra round trips.
//! Path segments are compared raw; the numbers used by the suites contain no
//! characters that percent-encode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Poll interval for the serve loop's stop flag.
const RECV_POLL: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Loopback Broker
// ============================================================================

/// Record store shared between the serve thread and the test body.
type RecordStore = Arc<Mutex<HashMap<(String, String), String>>>;

/// In-process broker serving the out-of-band exchange surface.
///
/// # Invariants
/// - The serve thread exits when the broker is dropped.
/// - Publish is an upsert; retrieve is a point lookup.
pub struct LoopbackBroker {
    /// Base URL of the bound loopback listener.
    base: Url,
    /// Stop flag observed by the serve loop.
    stop: Arc<AtomicBool>,
    /// Shared record store keyed by number pair.
    records: RecordStore,
    /// Serve thread handle, joined on drop.
    handle: Option<JoinHandle<()>>,
}

impl LoopbackBroker {
    /// Binds an ephemeral port and starts the serve thread.
    ///
    /// # Errors
    ///
    /// Returns a message when the listener or base URL cannot be built.
    pub fn start() -> Result<Self, String> {
        let server = Server::http("127.0.0.1:0").map_err(|err| err.to_string())?;
        let addr = server.server_addr();
        let base = Url::parse(&format!("http://{addr}")).map_err(|err| err.to_string())?;
        let stop = Arc::new(AtomicBool::new(false));
        let records: RecordStore = Arc::new(Mutex::new(HashMap::new()));
        let thread_stop = Arc::clone(&stop);
        let thread_records = Arc::clone(&records);
        let handle = thread::spawn(move || serve(&server, &thread_stop, &thread_records));
        Ok(Self {
            base,
            stop,
            records,
            handle: Some(handle),
        })
    }

    /// Returns the broker base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Seeds a record as if a prior publish had stored it.
    pub fn seed(&self, src: &str, dst: &str, passport: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.insert((src.to_string(), dst.to_string()), passport.to_string());
        }
    }

    /// Returns the stored passport for a number pair, if any.
    #[must_use]
    pub fn stored(&self, src: &str, dst: &str) -> Option<String> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&(src.to_string(), dst.to_string())).cloned())
    }
}

impl Drop for LoopbackBroker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Serve Loop
// ============================================================================

/// Serves requests until the stop flag is raised.
fn serve(server: &Server, stop: &AtomicBool, records: &RecordStore) {
    while !stop.load(Ordering::SeqCst) {
        let Ok(Some(mut request)) = server.recv_timeout(RECV_POLL) else {
            continue;
        };
        let response = route(&mut request, records);
        let _ = request.respond(response);
    }
}

/// Routes one request across the broker surface.
fn route(request: &mut Request, records: &RecordStore) -> Response<Cursor<Vec<u8>>> {
    let method = request.method().to_string();
    let path = request.url().to_string();
    match (method.as_str(), path.as_str()) {
        ("POST", "/publish") => publish(request, records),
        ("GET", "/health") => json_response(&json!({"message": "OK", "status": 200}), 200),
        ("GET", rest) => rest.strip_prefix("/retrieve/").map_or_else(
            || json_response(&json!({"message": "not found"}), 404),
            |tail| retrieve(tail, records),
        ),
        _ => json_response(&json!({"message": "not found"}), 404),
    }
}

/// Handles a publish upsert.
fn publish(request: &mut Request, records: &RecordStore) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    if request.as_reader().read_to_string(&mut body).is_err() {
        return json_response(&json!({"message": "Invalid request"}), 400);
    }
    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        return json_response(&json!({"message": "Invalid request"}), 400);
    };
    let (Some(src), Some(dst), Some(passport)) = (
        value.get("src").and_then(Value::as_str),
        value.get("dst").and_then(Value::as_str),
        value.get("passport").and_then(Value::as_str),
    ) else {
        return json_response(&json!({"message": "Invalid request"}), 400);
    };
    if let Ok(mut store) = records.lock() {
        store.insert((src.to_string(), dst.to_string()), passport.to_string());
    }
    json_response(&json!({"message": "OK"}), 201)
}

/// Handles a retrieve point lookup for `{src}/{dst}`.
fn retrieve(tail: &str, records: &RecordStore) -> Response<Cursor<Vec<u8>>> {
    let Some((src, dst)) = tail.split_once('/') else {
        return json_response(&json!({"message": "not found"}), 404);
    };
    let stored = records
        .lock()
        .ok()
        .and_then(|store| store.get(&(src.to_string(), dst.to_string())).cloned());
    stored.map_or_else(
        || json_response(&json!({"message": "not found"}), 404),
        |passport| json_response(&json!({"token": passport}), 200),
    )
}

/// Builds a JSON response with the given status code.
fn json_response(value: &Value, status: u16) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(value.to_string()).with_status_code(status)
}
