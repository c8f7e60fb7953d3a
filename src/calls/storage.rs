//! Authoritative in-memory call list
//!
//! `CallStore` is a cheap `Clone` handle; every clone sees the same calls,
//! selection and ingestion phase. Readers take snapshots; the only
//! mutators are `ingest`, `select_call` and `remove_call` (plus
//! `clear_selection`).

use super::search::{filter_calls, CallFilter};
use super::types::{AudioUpload, CallRecord};
use crate::config::AppConfig;
use crate::ingest::clock::{Clock, SystemClock};
use crate::ingest::pipeline::{self, IngestHandle, InFlightGuard};
use crate::ingest::random::{RandomSource, SeededRandom};
use crate::ingest::state::{CancelToken, IngestEvent, IngestPhase};
use crate::{CallInsightError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    /// Most recent first
    calls: Vec<CallRecord>,
    selected_id: Option<Uuid>,
    phase: IngestPhase,
}

/// Read-only view of the store at one point in time
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsSnapshot {
    pub calls: Vec<CallRecord>,
    pub selected_id: Option<Uuid>,
    pub phase: IngestPhase,
}

impl CallsSnapshot {
    pub fn selected_call(&self) -> Option<&CallRecord> {
        let id = self.selected_id?;
        self.calls.iter().find(|c| c.id == id)
    }
}

#[derive(Clone)]
pub struct CallStore {
    state: Arc<RwLock<StoreState>>,
    in_flight: Arc<AtomicBool>,
    subscribers: Arc<Mutex<Vec<Sender<IngestEvent>>>>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    clock: Arc<dyn Clock>,
    config: Arc<AppConfig>,
}

impl CallStore {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Empty store with the given settings, system clock, and a random
    /// source seeded from `config.synthesis.seed`
    ///
    /// Settings are validated when an ingestion is requested; an invalid
    /// configuration fails it with `ConfigError`.
    pub fn with_config(config: AppConfig) -> Self {
        let rng = SeededRandom::from_optional_seed(config.synthesis.seed);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            in_flight: Arc::new(AtomicBool::new(false)),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            rng: Arc::new(Mutex::new(Box::new(rng))),
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the random source
    pub fn with_random(self, rng: impl RandomSource + 'static) -> Self {
        *self.rng.lock() = Box::new(rng);
        self
    }

    /// Seed the list; the first element is shown first
    pub fn with_calls(self, calls: Vec<CallRecord>) -> Self {
        self.state.write().calls = calls;
        self
    }

    /// Seed the list with the demo calls, built from this store's clock and random source
    pub fn with_demo_calls(self) -> Self {
        let calls = {
            let mut rng = self.rng.lock();
            super::demo::demo_calls(
                &self.config.synthesis.segment_policy(),
                &mut **rng,
                self.clock.now(),
            )
        };
        self.with_calls(calls)
    }

    // === Reads ===

    /// Get a snapshot of current state (no lock held after return)
    pub fn snapshot(&self) -> CallsSnapshot {
        let state = self.state.read();
        CallsSnapshot {
            calls: state.calls.clone(),
            selected_id: state.selected_id,
            phase: state.phase,
        }
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.read().calls.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<CallRecord> {
        self.state.read().calls.iter().find(|c| c.id == id).cloned()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.state.read().selected_id
    }

    pub fn selected_call(&self) -> Option<CallRecord> {
        let state = self.state.read();
        let id = state.selected_id?;
        state.calls.iter().find(|c| c.id == id).cloned()
    }

    pub fn phase(&self) -> IngestPhase {
        self.state.read().phase
    }

    pub fn is_ingesting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.state.read().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().calls.is_empty()
    }

    /// Calls matching the filter, in list order
    pub fn search(&self, filter: &CallFilter) -> Vec<CallRecord> {
        let state = self.state.read();
        filter_calls(&state.calls, filter).into_iter().cloned().collect()
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Receive ingestion events from now on
    pub fn subscribe(&self) -> Receiver<IngestEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    // === Mutations ===

    /// Run the simulated upload pipeline and add the resulting record
    ///
    /// Blocks for the configured transfer and synthesis time.
    pub fn ingest(&self, upload: AudioUpload) -> Result<CallRecord> {
        self.ingest_with_cancel(upload, &CancelToken::new())
    }

    /// Like `ingest`, rolling back if `cancel` fires before the commit
    pub fn ingest_with_cancel(
        &self,
        upload: AudioUpload,
        cancel: &CancelToken,
    ) -> Result<CallRecord> {
        let guard = pipeline::prepare(self, &upload)?;
        pipeline::run(self, upload, guard, cancel)
    }

    /// Start an ingestion on a worker thread
    ///
    /// Validation and the busy check happen before this returns.
    pub fn spawn_ingest(&self, upload: AudioUpload) -> Result<IngestHandle> {
        let guard = pipeline::prepare(self, &upload)?;
        Ok(pipeline::spawn(self, upload, guard))
    }

    /// Select a call. Unknown ids are rejected and the selection is kept.
    pub fn select_call(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        if !state.calls.iter().any(|c| c.id == id) {
            warn!("Ignoring selection of unknown call {}", id);
            return Err(CallInsightError::NotFound(id));
        }
        debug!("Selected call {}", id);
        state.selected_id = Some(id);
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.state.write().selected_id = None;
    }

    /// Remove a call, clearing the selection if it pointed at it
    pub fn remove_call(&self, id: Uuid) -> Result<CallRecord> {
        let mut state = self.state.write();
        let index = state
            .calls
            .iter()
            .position(|c| c.id == id)
            .ok_or(CallInsightError::NotFound(id))?;

        let removed = state.calls.remove(index);
        if state.selected_id == Some(id) {
            state.selected_id = None;
        }
        info!("Removed call {} ({})", id, removed.filename);
        Ok(removed)
    }

    // === Pipeline hooks ===

    pub(crate) fn try_claim_ingest(&self) -> Option<InFlightGuard> {
        InFlightGuard::acquire(self, &self.in_flight)
    }

    pub(crate) fn release_ingest(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub(crate) fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub(crate) fn random(&self) -> MutexGuard<'_, Box<dyn RandomSource>> {
        self.rng.lock()
    }

    pub(crate) fn set_phase(&self, phase: IngestPhase) {
        self.state.write().phase = phase;
    }

    /// Prepend, select, and mark done under one lock
    pub(crate) fn commit(&self, record: CallRecord) {
        let mut state = self.state.write();
        let id = record.id;
        state.calls.insert(0, record);
        state.selected_id = Some(id);
        state.phase = IngestPhase::Done(id);
    }

    /// Send to every live subscriber, dropping disconnected ones
    pub(crate) fn publish(&self, event: IngestEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for CallStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CallStore")
            .field("calls", &state.calls.len())
            .field("selected_id", &state.selected_id)
            .field("phase", &state.phase)
            .finish()
    }
}
