//! Record synthesis: weighted sentiment draws and transcript segmentation
//!
//! Demo seed data and uploads share `build_segments`, so both obey the same
//! contiguity rules.

use crate::calls::{AudioUpload, CallAnalysis, CallRecord, EmotionTag, Segment, Sentiment};
use crate::config::{SentimentWeights, SynthesisConfig};
use crate::ingest::random::RandomSource;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const SYNTHETIC_TRANSCRIPT: &str = "This is a sample transcript for the newly uploaded call. \
    The system would normally process the audio file through a speech recognition service \
    to generate an actual transcript with proper timestamps and speaker segmentation.";

const SYNTHETIC_SUMMARY: &str = "This is an automatically generated summary of the call. \
    In a real deployment it would be produced by a language model from the transcript.";

const SYNTHETIC_KEY_POINTS: [&str; 3] = [
    "This is a simulated key point from the call",
    "In production, these would be extracted from the actual transcript",
    "Using natural language processing",
];

/// How a transcript is chunked into segments
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPolicy {
    pub min_words: usize,
    pub max_words: usize,
    pub seconds_per_word: f64,
    /// Probability a segment shares the overall sentiment
    pub bias: f64,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        SynthesisConfig::default().segment_policy()
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends
pub fn normalize_transcript(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Chunk a transcript into contiguous, word-aligned segments
///
/// Boundaries come from the running word count, never from summing
/// per-segment durations, so `end[i] == start[i + 1]` holds exactly.
pub fn build_segments(
    transcript: &str,
    overall: Sentiment,
    policy: &SegmentPolicy,
    rng: &mut dyn RandomSource,
) -> Vec<Segment> {
    let words: Vec<&str> = transcript.split_whitespace().collect();
    let min_words = policy.min_words.max(1);
    let max_words = policy.max_words.max(min_words);

    let mut segments = Vec::new();
    let mut position = 0usize;
    while position < words.len() {
        let length = rng.range_inclusive(min_words as u64, max_words as u64) as usize;
        let end = (position + length).min(words.len());

        segments.push(Segment {
            start_seconds: position as f64 * policy.seconds_per_word,
            end_seconds: end as f64 * policy.seconds_per_word,
            text: words[position..end].join(" "),
            sentiment: draw_segment_sentiment(overall, policy.bias, rng),
        });

        position = end;
    }

    segments
}

/// Weighted draw of a call's overall sentiment
pub fn draw_sentiment(weights: &SentimentWeights, rng: &mut dyn RandomSource) -> Sentiment {
    let total = weights.total();
    if total <= 0.0 {
        return Sentiment::Neutral;
    }

    let mut target = rng.next_f64() * total;
    for sentiment in Sentiment::ALL {
        let weight = weights.weight(sentiment);
        if target < weight {
            return sentiment;
        }
        target -= weight;
    }

    // Float rounding can leave a sliver past the last bucket
    Sentiment::ALL
        .iter()
        .rev()
        .copied()
        .find(|s| weights.weight(*s) > 0.0)
        .unwrap_or(Sentiment::Neutral)
}

/// Segment sentiment: the overall sentiment with probability `bias`,
/// otherwise one of the other two, uniformly
pub fn draw_segment_sentiment(
    overall: Sentiment,
    bias: f64,
    rng: &mut dyn RandomSource,
) -> Sentiment {
    if rng.next_f64() < bias {
        overall
    } else {
        let others = overall.others();
        others[rng.index(others.len())]
    }
}

/// `count` distinct tags, in draw order
pub fn draw_emotion_tags(count: usize, rng: &mut dyn RandomSource) -> Vec<EmotionTag> {
    let mut pool: Vec<EmotionTag> = EmotionTag::ALL.to_vec();
    let mut tags = Vec::with_capacity(count);
    while tags.len() < count && !pool.is_empty() {
        let idx = rng.index(pool.len());
        tags.push(pool.remove(idx));
    }
    tags
}

/// Build the complete record for an accepted upload
pub fn synthesize_record(
    upload: &AudioUpload,
    config: &SynthesisConfig,
    rng: &mut dyn RandomSource,
    uploaded_at: DateTime<Utc>,
) -> CallRecord {
    let duration_seconds =
        rng.range_inclusive(config.min_duration_seconds, config.max_duration_seconds);
    let overall_sentiment = draw_sentiment(&config.weights, rng);
    let sentiment_score = rng.next_f64() * 2.0 - 1.0;
    let emotion_tags = draw_emotion_tags(config.emotion_tag_count, rng);

    let transcript = normalize_transcript(SYNTHETIC_TRANSCRIPT);
    let segments = build_segments(
        &transcript,
        overall_sentiment,
        &config.segment_policy(),
        rng,
    );

    CallRecord {
        id: Uuid::new_v4(),
        filename: upload.name.clone(),
        duration_seconds,
        uploaded_at,
        user_id: None,
        audio_url: None,
        transcript,
        segments,
        analysis: CallAnalysis {
            overall_sentiment,
            sentiment_score,
            emotion_tags,
            summary: normalize_transcript(SYNTHETIC_SUMMARY),
            key_points: SYNTHETIC_KEY_POINTS.iter().map(|p| p.to_string()).collect(),
        },
    }
}
