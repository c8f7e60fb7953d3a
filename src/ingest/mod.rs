//! Simulated ingestion: phase state machine, synthesis, and injected
//! time and randomness.

pub mod clock;
pub(crate) mod pipeline;
pub mod random;
pub mod state;
pub mod synth;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pipeline::IngestHandle;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use state::{CancelToken, IngestEvent, IngestPhase};
pub use synth::{build_segments, normalize_transcript, SegmentPolicy};
