// system-tests/src/logging.rs
// ============================================================================
// Module: Test Logging
// Description: One-shot tracing initialization for system-test binaries.
// Purpose: Route session-tagged exchange events into test output.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! System tests initialize a process-wide `tracing` subscriber once so the
//! session-tagged exchange events are visible in captured test output.
//! Filtering follows `RUST_LOG`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Once;

use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// One-shot guard for subscriber installation.
static INIT: Once = Once::new();

/// Installs the test subscriber on first call; later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
