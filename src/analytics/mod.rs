//! Derived statistics for the dashboard and reports views
//!
//! Everything here is a pure function of a call slice: no locks, no
//! shared state, same output for the same input.

pub mod format;

pub use format::{format_duration, format_timestamp, ScoreBand};

use crate::calls::{CallRecord, EmotionTag, Sentiment};
use serde::Serialize;

/// Number of emotions shown on the reports bar chart
pub const REPORT_TOP_EMOTIONS: usize = 5;

/// Calls per overall sentiment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

pub fn sentiment_distribution(calls: &[CallRecord]) -> SentimentDistribution {
    calls
        .iter()
        .fold(SentimentDistribution::default(), |mut acc, call| {
            match call.analysis.overall_sentiment {
                Sentiment::Positive => acc.positive += 1,
                Sentiment::Neutral => acc.neutral += 1,
                Sentiment::Negative => acc.negative += 1,
            }
            acc
        })
}

/// Most frequent emotion tags across all calls, at most `k`
///
/// Sorted by count descending; equal counts keep the order in which the
/// tags were first seen.
pub fn top_emotions(calls: &[CallRecord], k: usize) -> Vec<(EmotionTag, usize)> {
    let mut counts: Vec<(EmotionTag, usize)> = Vec::new();
    for tag in calls.iter().flat_map(|c| c.analysis.emotion_tags.iter()) {
        match counts.iter_mut().find(|(t, _)| t == tag) {
            Some((_, n)) => *n += 1,
            None => counts.push((*tag, 1)),
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

pub fn total_duration_seconds(calls: &[CallRecord]) -> u64 {
    calls.iter().map(|c| c.duration_seconds).sum()
}

pub fn total_minutes(calls: &[CallRecord]) -> f64 {
    total_duration_seconds(calls) as f64 / 60.0
}

/// Share of calls with the given overall sentiment; 0 for no calls
pub fn sentiment_rate(calls: &[CallRecord], sentiment: Sentiment) -> f64 {
    if calls.is_empty() {
        return 0.0;
    }
    let matching = calls
        .iter()
        .filter(|c| c.analysis.overall_sentiment == sentiment)
        .count();
    matching as f64 / calls.len() as f64
}

pub fn positive_rate(calls: &[CallRecord]) -> f64 {
    sentiment_rate(calls, Sentiment::Positive)
}

pub fn negative_rate(calls: &[CallRecord]) -> f64 {
    sentiment_rate(calls, Sentiment::Negative)
}

/// Rate as a whole percent, rounded half away from zero
pub fn percentage(rate: f64) -> u32 {
    (rate * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Figures shown on the dashboard cards and reports page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReport {
    pub call_count: usize,
    pub total_duration_seconds: u64,
    pub total_minutes: f64,
    pub distribution: SentimentDistribution,
    pub positive_rate: f64,
    pub negative_rate: f64,
    pub positive_percent: u32,
    pub negative_percent: u32,
    pub top_emotions: Vec<(EmotionTag, usize)>,
}

impl CallReport {
    pub fn from_calls(calls: &[CallRecord]) -> Self {
        let positive_rate = positive_rate(calls);
        let negative_rate = negative_rate(calls);
        Self {
            call_count: calls.len(),
            total_duration_seconds: total_duration_seconds(calls),
            total_minutes: total_minutes(calls),
            distribution: sentiment_distribution(calls),
            positive_rate,
            negative_rate,
            positive_percent: percentage(positive_rate),
            negative_percent: percentage(negative_rate),
            top_emotions: top_emotions(calls, REPORT_TOP_EMOTIONS),
        }
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} calls | {:.1} mins | {}% positive | {}% negative",
            self.call_count, self.total_minutes, self.positive_percent, self.negative_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallAnalysis;
    use crate::ingest::random::{RandomSource, SeededRandom};
    use chrono::Utc;
    use uuid::Uuid;

    fn call(sentiment: Sentiment, duration: u64, tags: &[EmotionTag]) -> CallRecord {
        CallRecord {
            id: Uuid::new_v4(),
            filename: "call.mp3".to_string(),
            duration_seconds: duration,
            uploaded_at: Utc::now(),
            user_id: None,
            audio_url: None,
            transcript: String::new(),
            segments: vec![],
            analysis: CallAnalysis {
                overall_sentiment: sentiment,
                sentiment_score: 0.0,
                emotion_tags: tags.to_vec(),
                summary: String::new(),
                key_points: vec![],
            },
        }
    }

    #[test]
    fn test_empty_input() {
        let calls: Vec<CallRecord> = vec![];
        assert_eq!(sentiment_distribution(&calls), SentimentDistribution::default());
        assert_eq!(positive_rate(&calls), 0.0);
        assert_eq!(negative_rate(&calls), 0.0);
        assert_eq!(total_duration_seconds(&calls), 0);
        assert!(top_emotions(&calls, 5).is_empty());

        let report = CallReport::from_calls(&calls);
        assert_eq!(report.positive_percent, 0);
        assert!(!report.positive_rate.is_nan());
    }

    #[test]
    fn test_distribution_sums_to_len() {
        let mut rng = SeededRandom::with_seed(21);
        for n in 0..50 {
            let calls: Vec<CallRecord> = (0..n)
                .map(|_| call(Sentiment::ALL[rng.index(3)], 60, &[]))
                .collect();
            assert_eq!(sentiment_distribution(&calls).total(), calls.len());
        }
    }

    #[test]
    fn test_distribution_counts() {
        let calls = vec![
            call(Sentiment::Positive, 60, &[]),
            call(Sentiment::Positive, 60, &[]),
            call(Sentiment::Negative, 60, &[]),
        ];
        let dist = sentiment_distribution(&calls);
        assert_eq!(dist.positive, 2);
        assert_eq!(dist.neutral, 0);
        assert_eq!(dist.count(Sentiment::Negative), 1);
    }

    #[test]
    fn test_top_emotions_sorted_and_limited() {
        use EmotionTag::*;
        let calls = vec![
            call(Sentiment::Positive, 60, &[Happy, Satisfied]),
            call(Sentiment::Negative, 60, &[Angry, Frustrated, AskedForRefund]),
            call(Sentiment::Positive, 60, &[Frustrated, Confused, Satisfied]),
        ];

        let top = top_emotions(&calls, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], (Satisfied, 2));
        assert_eq!(top[1], (Frustrated, 2));
        assert_eq!(top[2], (Happy, 1));
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_top_emotions_ties_keep_first_seen_order() {
        use EmotionTag::*;
        let calls = vec![
            call(Sentiment::Neutral, 60, &[TechnicalIssue, Confused]),
            call(Sentiment::Neutral, 60, &[Interested, Happy]),
        ];

        let top = top_emotions(&calls, 10);
        let tags: Vec<EmotionTag> = top.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![TechnicalIssue, Confused, Interested, Happy]);
    }

    #[test]
    fn test_top_emotions_zero_k() {
        let calls = vec![call(Sentiment::Neutral, 60, &[EmotionTag::Happy])];
        assert!(top_emotions(&calls, 0).is_empty());
    }

    #[test]
    fn test_rates_and_totals() {
        let calls = vec![
            call(Sentiment::Positive, 120, &[]),
            call(Sentiment::Negative, 60, &[]),
            call(Sentiment::Neutral, 90, &[]),
        ];
        assert_eq!(total_duration_seconds(&calls), 270);
        assert!((total_minutes(&calls) - 4.5).abs() < 1e-9);
        assert!((positive_rate(&calls) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(percentage(positive_rate(&calls)), 33);
        assert_eq!(percentage(2.0 / 3.0), 67);
    }

    #[test]
    fn test_report_summary() {
        let calls = vec![call(Sentiment::Positive, 120, &[EmotionTag::Happy])];
        let report = CallReport::from_calls(&calls);
        assert_eq!(report.summary(), "1 calls | 2.0 mins | 100% positive | 0% negative");
        assert_eq!(report.top_emotions, vec![(EmotionTag::Happy, 1)]);
    }
}
