use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Capitalized label as shown in call lists
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// The two sentiments other than this one, in declaration order
    pub fn others(&self) -> [Sentiment; 2] {
        match self {
            Sentiment::Positive => [Sentiment::Neutral, Sentiment::Negative],
            Sentiment::Neutral => [Sentiment::Positive, Sentiment::Negative],
            Sentiment::Negative => [Sentiment::Positive, Sentiment::Neutral],
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// Closed vocabulary of emotion and intent labels attached to a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionTag {
    Happy,
    Satisfied,
    Frustrated,
    Angry,
    Confused,
    Interested,
    #[serde(rename = "Asked for refund")]
    AskedForRefund,
    #[serde(rename = "Requested information")]
    RequestedInformation,
    #[serde(rename = "Technical issue")]
    TechnicalIssue,
}

impl EmotionTag {
    pub const ALL: [EmotionTag; 9] = [
        EmotionTag::Happy,
        EmotionTag::Satisfied,
        EmotionTag::Frustrated,
        EmotionTag::Angry,
        EmotionTag::Confused,
        EmotionTag::Interested,
        EmotionTag::AskedForRefund,
        EmotionTag::RequestedInformation,
        EmotionTag::TechnicalIssue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmotionTag::Happy => "Happy",
            EmotionTag::Satisfied => "Satisfied",
            EmotionTag::Frustrated => "Frustrated",
            EmotionTag::Angry => "Angry",
            EmotionTag::Confused => "Confused",
            EmotionTag::Interested => "Interested",
            EmotionTag::AskedForRefund => "Asked for refund",
            EmotionTag::RequestedInformation => "Requested information",
            EmotionTag::TechnicalIssue => "Technical issue",
        }
    }
}

impl std::fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A contiguous, word-aligned slice of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
    pub sentiment: Sentiment,
}

impl Segment {
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAnalysis {
    pub overall_sentiment: Sentiment,
    /// -1.0 (very negative) to 1.0 (very positive)
    pub sentiment_score: f64,
    pub emotion_tags: Vec<EmotionTag>,
    pub summary: String,
    pub key_points: Vec<String>,
}

/// One analyzed call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: Uuid,
    pub filename: String,
    pub duration_seconds: u64,
    pub uploaded_at: DateTime<Utc>,
    /// Owner of the call, when uploaded by a signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Where the original audio lives; simulated uploads keep no audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub transcript: String,
    pub segments: Vec<Segment>,
    pub analysis: CallAnalysis,
}

impl CallRecord {
    /// Rebuild the transcript from the segment texts
    pub fn joined_segments(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check that segments start at zero, abut each other, and cover the transcript
    pub fn segments_are_contiguous(&self) -> bool {
        if self.segments.is_empty() {
            return self.transcript.is_empty();
        }
        if self.segments[0].start_seconds != 0.0 {
            return false;
        }
        let ordered = self.segments.windows(2).all(|w| w[0].end_seconds == w[1].start_seconds);
        let positive = self.segments.iter().all(|s| s.start_seconds < s.end_seconds);
        ordered && positive && self.joined_segments() == self.transcript
    }

    /// Segment playing at the given offset, if any
    pub fn segment_at(&self, seconds: f64) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.start_seconds <= seconds && seconds < s.end_seconds)
    }
}

/// An uploaded file as seen by the ingestion pipeline. Content is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioUpload {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl AudioUpload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("audio/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
            sentiment: Sentiment::Neutral,
        }
    }

    fn record(transcript: &str, segments: Vec<Segment>) -> CallRecord {
        CallRecord {
            id: Uuid::new_v4(),
            filename: "call.mp3".to_string(),
            duration_seconds: 60,
            uploaded_at: Utc::now(),
            user_id: None,
            audio_url: None,
            transcript: transcript.to_string(),
            segments,
            analysis: CallAnalysis {
                overall_sentiment: Sentiment::Neutral,
                sentiment_score: 0.0,
                emotion_tags: vec![],
                summary: String::new(),
                key_points: vec![],
            },
        }
    }

    #[test]
    fn test_contiguity_check() {
        let ok = record(
            "hello there general kenobi",
            vec![seg(0.0, 0.6, "hello there"), seg(0.6, 1.2, "general kenobi")],
        );
        assert!(ok.segments_are_contiguous());

        let gap = record(
            "hello there general kenobi",
            vec![seg(0.0, 0.6, "hello there"), seg(0.7, 1.2, "general kenobi")],
        );
        assert!(!gap.segments_are_contiguous());

        let missing_word = record("hello there general kenobi", vec![seg(0.0, 0.6, "hello there")]);
        assert!(!missing_word.segments_are_contiguous());
    }

    #[test]
    fn test_segment_at() {
        let rec = record(
            "a b c d",
            vec![seg(0.0, 0.6, "a b"), seg(0.6, 1.2, "c d")],
        );
        assert_eq!(rec.segment_at(0.0).map(|s| s.text.as_str()), Some("a b"));
        assert_eq!(rec.segment_at(0.6).map(|s| s.text.as_str()), Some("c d"));
        assert!(rec.segment_at(1.2).is_none());
    }

    #[test]
    fn test_optional_owner_and_audio_fields() {
        let mut rec = record("a b", vec![seg(0.0, 0.6, "a b")]);
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("userId").is_none());
        assert!(json.get("audioUrl").is_none());

        // Records stored without the fields still load
        let restored: CallRecord = serde_json::from_value(json).unwrap();
        assert_eq!(restored, rec);

        rec.user_id = Some("agent-7".to_string());
        rec.audio_url = Some("https://calls.example/a.mp3".to_string());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["userId"], "agent-7");
        assert_eq!(json["audioUrl"], "https://calls.example/a.mp3");
    }

    #[test]
    fn test_audio_mime_detection() {
        assert!(AudioUpload::new("a.mp3", "audio/mpeg", 10).is_audio());
        assert!(AudioUpload::new("a.wav", "Audio/WAV", 10).is_audio());
        assert!(!AudioUpload::new("a.txt", "text/plain", 10).is_audio());
        assert!(!AudioUpload::new("a.bin", "", 10).is_audio());
    }

    #[test]
    fn test_serialized_field_names() {
        let rec = record("a b", vec![seg(0.0, 0.6, "a b")]);
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("durationSeconds").is_some());
        assert_eq!(json["analysis"]["overallSentiment"], "neutral");
        assert_eq!(
            serde_json::to_value(EmotionTag::AskedForRefund).unwrap(),
            "Asked for refund"
        );
    }

    #[test]
    fn test_sentiment_others() {
        for s in Sentiment::ALL {
            assert!(!s.others().contains(&s));
        }
    }
}
