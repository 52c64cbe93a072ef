//! In-Memory Planner Store Adapter
//!
//! Keeps the planner document in memory. Useful for testing and development:
//! failures can be forced, fetches and saves can be held open to exercise
//! edits that race a network call, and every saved payload is recorded.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Semaphore;

use crate::domain::foundation::SessionToken;
use crate::ports::{PlannerStore, StoreError};

/// In-memory planner store.
#[derive(Debug, Clone)]
pub struct InMemoryPlannerStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    document: RwLock<Value>,
    saved: RwLock<Vec<Value>>,
    fetch_error: RwLock<Option<StoreError>>,
    save_error: RwLock<Option<StoreError>>,
    save_gate: RwLock<Option<Arc<Semaphore>>>,
    fetch_gate: RwLock<Option<Arc<Semaphore>>>,
    stamp_revision: bool,
    fetch_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryPlannerStore {
    /// Creates a store holding `document`.
    pub fn new(document: Value) -> Self {
        Self::build(document, false)
    }

    /// Creates a store that stamps an increasing `revision` field on every
    /// save, the way a server normalizes documents.
    pub fn with_revision_stamp(document: Value) -> Self {
        Self::build(document, true)
    }

    fn build(document: Value, stamp_revision: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                document: RwLock::new(document),
                saved: RwLock::new(Vec::new()),
                fetch_error: RwLock::new(None),
                save_error: RwLock::new(None),
                save_gate: RwLock::new(None),
                fetch_gate: RwLock::new(None),
                stamp_revision,
                fetch_count: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Forces every fetch to fail with `error` until cleared.
    pub fn fail_fetch(&self, error: Option<StoreError>) {
        *self.inner.fetch_error.write().unwrap() = error;
    }

    /// Forces every save to fail with `error` until cleared.
    pub fn fail_save(&self, error: Option<StoreError>) {
        *self.inner.save_error.write().unwrap() = error;
    }

    /// Makes saves wait until [`release_save`](Self::release_save) is called.
    pub fn hold_saves(&self) {
        *self.inner.save_gate.write().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets one held save complete.
    pub fn release_save(&self) {
        if let Some(gate) = self.inner.save_gate.read().unwrap().as_ref() {
            gate.add_permits(1);
        }
    }

    /// Stops holding saves. Saves already waiting need `release_save`.
    pub fn stop_holding_saves(&self) {
        *self.inner.save_gate.write().unwrap() = None;
    }

    /// Makes fetches wait until [`release_fetch`](Self::release_fetch) is
    /// called. A held fetch reads the document only once released.
    pub fn hold_fetches(&self) {
        *self.inner.fetch_gate.write().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets one held fetch complete.
    pub fn release_fetch(&self) {
        if let Some(gate) = self.inner.fetch_gate.read().unwrap().as_ref() {
            gate.add_permits(1);
        }
    }

    /// Stops holding fetches. Fetches already waiting need `release_fetch`.
    pub fn stop_holding_fetches(&self) {
        *self.inner.fetch_gate.write().unwrap() = None;
    }

    /// Current stored document.
    pub fn document(&self) -> Value {
        self.inner.document.read().unwrap().clone()
    }

    /// Every payload passed to `save`, oldest first, failed saves included.
    pub fn saved_payloads(&self) -> Vec<Value> {
        self.inner.saved.read().unwrap().clone()
    }

    /// Number of save calls that started, including failed ones.
    pub fn save_attempts(&self) -> usize {
        self.inner.saved.read().unwrap().len()
    }

    pub fn fetch_count(&self) -> usize {
        self.inner.fetch_count.load(Ordering::SeqCst)
    }

    /// Highest number of saves observed running at the same time.
    pub fn max_concurrent_saves(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryPlannerStore {
    fn default() -> Self {
        Self::new(json!({ "curriculum": [], "planned_codes": [] }))
    }
}

/// Decrements the in-flight counter however the save ends.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlannerStore for InMemoryPlannerStore {
    async fn fetch(&self, _token: &SessionToken) -> Result<Value, StoreError> {
        self.inner.fetch_count.fetch_add(1, Ordering::SeqCst);

        let gate = self.inner.fetch_gate.read().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| StoreError::network(e.to_string()))?
                .forget();
        }

        if let Some(error) = self.inner.fetch_error.read().unwrap().clone() {
            return Err(error);
        }
        Ok(self.document())
    }

    async fn save(&self, _token: &SessionToken, payload: &Value) -> Result<Value, StoreError> {
        let running = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.inner.in_flight);

        self.inner.saved.write().unwrap().push(payload.clone());

        let gate = self.inner.save_gate.read().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| StoreError::network(e.to_string()))?
                .forget();
        }

        if let Some(error) = self.inner.save_error.read().unwrap().clone() {
            return Err(error);
        }

        let mut stored = payload.clone();
        if self.inner.stamp_revision {
            let previous = self.inner.document.read().unwrap()["revision"]
                .as_u64()
                .unwrap_or(0);
            if let Value::Object(map) = &mut stored {
                map.insert("revision".to_string(), json!(previous + 1));
            }
        }
        *self.inner.document.write().unwrap() = stored.clone();
        Ok(stored)
    }
}
