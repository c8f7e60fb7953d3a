//! Random source for synthesis
//!
//! Synthesis only ever asks for uniform floats and bounded integers, so
//! tests can script the exact sequence a record is built from.

pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`. Requires `lo <= hi`.
    fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.next_f64() * span) as u64;
        lo + offset.min(hi - lo)
    }

    /// Uniform index into a collection of `len` items. Requires `len > 0`.
    fn index(&mut self, len: usize) -> usize {
        self.range_inclusive(0, len as u64 - 1) as usize
    }
}

/// fastrand-backed source, optionally seeded
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: fastrand::Rng,
}

impl SeededRandom {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map(Self::with_seed).unwrap_or_default()
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.f64()
    }

    fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.u64(lo..=hi)
    }
}

/// Replays a fixed sequence of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values are clamped into `[0, 1)`. An empty script yields zeros.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
