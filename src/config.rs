//! Configuration for the call store and the simulated ingestion pipeline
//!
//! Every field has a default, so a TOML file only needs the keys it changes.

use crate::calls::{EmotionTag, Sentiment};
use crate::ingest::SegmentPolicy;
use crate::{CallInsightError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Pacing of the simulated upload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Time between transfer progress ticks
    pub tick_interval_ms: u64,

    /// Progress added per tick (percent)
    pub progress_step: u8,

    /// Fixed wait in the synthesizing phase
    pub synthesis_delay_ms: u64,

    /// Uploads above this size are rejected
    pub max_upload_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 300,
            progress_step: 10,
            synthesis_delay_ms: 4000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl IngestConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn synthesis_delay(&self) -> Duration {
        Duration::from_millis(self.synthesis_delay_ms)
    }
}

/// Relative weights for drawing a call's overall sentiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentWeights {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Default for SentimentWeights {
    fn default() -> Self {
        Self {
            positive: 0.4,
            neutral: 0.3,
            negative: 0.3,
        }
    }
}

impl SentimentWeights {
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }

    pub fn weight(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Policy for synthesizing a record's analysis and segments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Fewest words in one segment
    pub min_segment_words: usize,

    /// Most words in one segment
    pub max_segment_words: usize,

    /// Speaking rate used to place segment boundaries
    pub seconds_per_word: f64,

    /// Probability that a segment shares the call's overall sentiment
    pub segment_bias: f64,

    /// Overall sentiment draw weights
    pub weights: SentimentWeights,

    /// Shortest synthesized call duration
    pub min_duration_seconds: u64,

    /// Longest synthesized call duration
    pub max_duration_seconds: u64,

    /// Distinct emotion tags attached to a synthesized call
    pub emotion_tag_count: usize,

    /// Seed for reproducible synthesis; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            min_segment_words: 5,
            max_segment_words: 15,
            seconds_per_word: 0.3,
            segment_bias: 0.7,
            weights: SentimentWeights::default(),
            min_duration_seconds: 60,
            max_duration_seconds: 359,
            emotion_tag_count: 2,
            seed: None,
        }
    }
}

impl SynthesisConfig {
    pub fn segment_policy(&self) -> SegmentPolicy {
        SegmentPolicy {
            min_words: self.min_segment_words,
            max_words: self.max_segment_words,
            seconds_per_word: self.seconds_per_word,
            bias: self.segment_bias,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub synthesis: SynthesisConfig,

    /// Boot the store with the demo calls
    pub seed_demo_calls: bool,
}

impl AppConfig {
    /// Load and validate a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            CallInsightError::ConfigError(msg) => {
                CallInsightError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| CallInsightError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with no waits, for tests and batch seeding
    pub fn instant() -> Self {
        Self::default().with_tick_interval(Duration::ZERO).with_synthesis_delay(Duration::ZERO)
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.ingest.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_synthesis_delay(mut self, delay: Duration) -> Self {
        self.ingest.synthesis_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_progress_step(mut self, step: u8) -> Self {
        self.ingest.progress_step = step;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.synthesis.seed = Some(seed);
        self
    }

    pub fn with_demo_calls(mut self) -> Self {
        self.seed_demo_calls = true;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let ingest = &self.ingest;
        let synth = &self.synthesis;

        if ingest.progress_step == 0 || ingest.progress_step > 100 {
            return Err(CallInsightError::ConfigError(format!(
                "progress_step must be between 1 and 100, got {}",
                ingest.progress_step
            )));
        }

        if synth.min_segment_words == 0 {
            return Err(CallInsightError::ConfigError(
                "min_segment_words must be at least 1".to_string(),
            ));
        }

        if synth.min_segment_words > synth.max_segment_words {
            return Err(CallInsightError::ConfigError(format!(
                "min_segment_words ({}) exceeds max_segment_words ({})",
                synth.min_segment_words, synth.max_segment_words
            )));
        }

        if !(synth.seconds_per_word.is_finite() && synth.seconds_per_word > 0.0) {
            return Err(CallInsightError::ConfigError(format!(
                "seconds_per_word must be positive, got {}",
                synth.seconds_per_word
            )));
        }

        if !(0.0..=1.0).contains(&synth.segment_bias) {
            return Err(CallInsightError::ConfigError(format!(
                "segment_bias must be within [0, 1], got {}",
                synth.segment_bias
            )));
        }

        let weights = &synth.weights;
        let all_valid = Sentiment::ALL
            .iter()
            .all(|s| weights.weight(*s).is_finite() && weights.weight(*s) >= 0.0);
        if !all_valid || weights.total() <= 0.0 {
            return Err(CallInsightError::ConfigError(
                "sentiment weights must be non-negative and not all zero".to_string(),
            ));
        }

        if synth.min_duration_seconds > synth.max_duration_seconds {
            return Err(CallInsightError::ConfigError(format!(
                "min_duration_seconds ({}) exceeds max_duration_seconds ({})",
                synth.min_duration_seconds, synth.max_duration_seconds
            )));
        }

        if synth.emotion_tag_count > EmotionTag::ALL.len() {
            return Err(CallInsightError::ConfigError(format!(
                "emotion_tag_count must be at most {}, got {}",
                EmotionTag::ALL.len(),
                synth.emotion_tag_count
            )));
        }

        Ok(())
    }
}
