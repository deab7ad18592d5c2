//! Fixture-backed transport.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chatpilot_shared::{ApiError, Method};
use serde_json::Value;

use super::{Request, Transport};
use crate::fixtures::{self, MockEntry, MockTable};

/// Simulated latency for queries.
pub const QUERY_DELAY: Duration = Duration::from_millis(500);
/// Simulated latency for mutations.
pub const MUTATION_DELAY: Duration = Duration::from_millis(800);

/// Answers requests from a [`MockTable`] after a fixed delay.
///
/// A request whose signature has no entry fails with
/// [`ApiError::NotFound`] naming the key, so every new call site needs a
/// matching fixture.
#[derive(Debug)]
pub struct MockTransport {
    table: Mutex<MockTable>,
    calls: Mutex<HashMap<String, usize>>,
    query_delay: Duration,
    mutation_delay: Duration,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// The development fixtures with the default delays.
    pub fn new() -> Self {
        Self::with_table(fixtures::default_table())
    }

    pub fn with_table(table: MockTable) -> Self {
        Self {
            table: Mutex::new(table),
            calls: Mutex::new(HashMap::new()),
            query_delay: QUERY_DELAY,
            mutation_delay: MUTATION_DELAY,
        }
    }

    /// Use one delay for every request. `Duration::ZERO` answers immediately.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self.mutation_delay = delay;
        self
    }

    /// Replace (or add) the canned payload for a signature.
    pub fn set_response(&self, method: Method, path: &str, value: Value) {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert_static(method, path, value);
    }

    /// Drop the entry for a signature; later calls fail with `NotFound`.
    pub fn remove_response(&self, method: Method, path: &str) {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(method, path);
    }

    /// How many requests were made for a signature, answered or not.
    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chatpilot_shared::request_key(method, path))
            .copied()
            .unwrap_or(0)
    }

    fn delay_for(&self, method: Method) -> Duration {
        if method.is_mutation() {
            self.mutation_delay
        } else {
            self.query_delay
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<MockEntry> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(method, path)
            .cloned()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl Transport for MockTransport {
    async fn request(&self, request: Request) -> Result<Value, ApiError> {
        let key = request.key();
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_insert(0) += 1;

        let delay = self.delay_for(request.method);
        if !delay.is_zero() {
            crate::task::sleep(delay).await;
        }

        // Looked up after the delay so fixture edits made meanwhile apply.
        let entry = self
            .lookup(request.method, &request.path)
            .ok_or_else(|| ApiError::NotFound(key.clone()))?;
        let result = entry.respond(request.body.as_ref());
        if let Err(e) = &result {
            crate::log_debug!("mock {} failed: {}", key, e);
        }
        result
    }
}
