use super::types::{CallRecord, Sentiment};
use serde::{Deserialize, Serialize};

/// Search box and sentiment dropdown of the calls list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFilter {
    /// Case-insensitive substring of filename or transcript; empty matches all
    pub query: String,
    /// `None` means any sentiment
    pub sentiment: Option<Sentiment>,
}

impl CallFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn matches(&self, call: &CallRecord) -> bool {
        let sentiment_ok = self
            .sentiment
            .map_or(true, |s| call.analysis.overall_sentiment == s);
        if !sentiment_ok {
            return false;
        }

        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || call.filename.to_lowercase().contains(&needle)
            || call.transcript.to_lowercase().contains(&needle)
    }
}

pub fn filter_calls<'a>(calls: &'a [CallRecord], filter: &CallFilter) -> Vec<&'a CallRecord> {
    calls.iter().filter(|c| filter.matches(c)).collect()
}
