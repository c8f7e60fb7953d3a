//! Simulated upload pipeline
//!
//! Drives one ingestion through transfer, synthesis and commit against a
//! `CallStore`. Validation and the single-flight guard run before any
//! state change so rejected uploads leave the store untouched.

use crate::calls::{AudioUpload, CallRecord, CallStore};
use crate::ingest::state::{CancelToken, IngestEvent, IngestPhase};
use crate::ingest::synth::synthesize_record;
use crate::{CallInsightError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Holds the store's single ingestion slot
///
/// Dropping the guard frees the slot. An ingestion that never settled
/// (worker panic) has its phase put back to where it was before the claim.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    store: CallStore,
    prior_phase: IngestPhase,
    settled: bool,
}

impl InFlightGuard {
    pub(crate) fn acquire(store: &CallStore, flag: &AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                store: store.clone(),
                prior_phase: store.phase(),
                settled: false,
            })
    }

    pub(crate) fn prior_phase(&self) -> IngestPhase {
        self.prior_phase
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.settled && self.store.phase().is_active() {
            warn!(
                "Ingestion ended without settling, restoring phase {}",
                self.prior_phase
            );
            self.store.set_phase(self.prior_phase);
        }
        self.store.release_ingest();
    }
}

/// Handle to an ingestion running on a worker thread
#[derive(Debug)]
pub struct IngestHandle {
    cancel: CancelToken,
    handle: JoinHandle<Result<CallRecord>>,
}

impl IngestHandle {
    /// Request cancellation. The worker rolls back at its next wait.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its outcome
    pub fn join(self) -> Result<CallRecord> {
        self.handle.join().unwrap_or_else(|_| {
            Err(CallInsightError::PipelineError(
                "ingestion worker panicked".to_string(),
            ))
        })
    }
}

/// Validate the upload and claim the store's single ingestion slot
pub(crate) fn prepare(store: &CallStore, upload: &AudioUpload) -> Result<InFlightGuard> {
    if !upload.is_audio() {
        warn!("Rejected upload {}: mime type {:?}", upload.name, upload.mime_type);
        return Err(CallInsightError::InvalidInput(format!(
            "{} has mime type {:?}, expected audio/*",
            upload.name, upload.mime_type
        )));
    }

    let max_bytes = store.config().ingest.max_upload_bytes;
    if upload.size_bytes > max_bytes {
        warn!(
            "Rejected upload {}: {} bytes exceeds limit of {}",
            upload.name, upload.size_bytes, max_bytes
        );
        return Err(CallInsightError::InvalidInput(format!(
            "{} is {} bytes, limit is {}",
            upload.name, upload.size_bytes, max_bytes
        )));
    }

    if let Err(e) = store.config().validate() {
        warn!("Rejected upload {}: {}", upload.name, e);
        return Err(e);
    }

    store.try_claim_ingest().ok_or_else(|| {
        warn!("Rejected upload {}: ingestion already in flight", upload.name);
        CallInsightError::Busy
    })
}

/// Run a prepared ingestion to completion or cancellation
pub(crate) fn run(
    store: &CallStore,
    upload: AudioUpload,
    guard: InFlightGuard,
    cancel: &CancelToken,
) -> Result<CallRecord> {
    let config = store.config();
    let clock = store.clock();

    info!("Ingesting {} ({} bytes)", upload.name, upload.size_bytes);
    store.set_phase(IngestPhase::Transferring(0));
    store.publish(IngestEvent::Started {
        filename: upload.name.clone(),
    });
    store.publish(IngestEvent::Progress(0));

    let step = config.ingest.progress_step.max(1);
    let mut progress = 0u8;
    while progress < 100 {
        clock.sleep(config.ingest.tick_interval());
        if cancel.is_cancelled() {
            return Err(roll_back(store, &upload, guard));
        }
        progress = progress.saturating_add(step).min(100);
        debug!("Transfer progress for {}: {}%", upload.name, progress);
        store.set_phase(IngestPhase::Transferring(progress));
        store.publish(IngestEvent::Progress(progress));
    }

    store.set_phase(IngestPhase::Synthesizing);
    store.publish(IngestEvent::Synthesizing);

    clock.sleep(config.ingest.synthesis_delay());
    if cancel.is_cancelled() {
        return Err(roll_back(store, &upload, guard));
    }

    let record = {
        let mut rng = store.random();
        synthesize_record(&upload, &config.synthesis, &mut **rng, clock.now())
    };

    store.commit(record.clone());
    guard.settle();

    info!(
        "Ingested {} as {} ({} segments, {})",
        record.filename,
        record.id,
        record.segments.len(),
        record.analysis.overall_sentiment
    );
    store.publish(IngestEvent::Completed(record.id));

    Ok(record)
}

/// Spawn a prepared ingestion on a worker thread
pub(crate) fn spawn(store: &CallStore, upload: AudioUpload, guard: InFlightGuard) -> IngestHandle {
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let worker_store = store.clone();

    let handle = std::thread::spawn(move || run(&worker_store, upload, guard, &worker_cancel));

    IngestHandle { cancel, handle }
}

fn roll_back(store: &CallStore, upload: &AudioUpload, guard: InFlightGuard) -> CallInsightError {
    info!("Ingestion of {} cancelled, rolling back", upload.name);
    store.set_phase(guard.prior_phase());
    guard.settle();
    store.publish(IngestEvent::Cancelled);
    CallInsightError::Cancelled
}
