//! Default [`Logger`] implementations.
//!
//! Grounded on the `tracing` + `tracing-subscriber` ambient logging stack
//! used throughout the reference corpus (`freddiehaddad-oxidized`'s
//! `core-config`, `KazeONGUENE-rope`'s workspace dependencies): the core
//! itself never initializes a global subscriber, it just emits events
//! through whichever `Logger` the embedding binary wires up.

use crate::capabilities::Logger;

/// Emits every diagnostic as a `tracing::debug!` event, matching spec
/// §4.9's "diagnostics are emitted through a pluggable logger sink at
/// `debug` level".
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "fnv_memdump_reconstruct", "{message}");
    }
}

/// Discards every diagnostic. Useful for tests and for callers who haven't
/// set up a `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str) {}
}

/// Collects diagnostics in-memory; used by integration tests to assert on
/// merge-pass summaries without a real tracing subscriber.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: std::sync::Mutex<Vec<String>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
