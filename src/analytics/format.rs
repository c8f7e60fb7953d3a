//! Display helpers for durations and sentiment scores

use serde::Serialize;

/// `m:ss`, e.g. 187 seconds → "3:07"
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Segment offset as `m:ss`, truncating fractional seconds
pub fn format_timestamp(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format_duration(whole)
}

/// Verbal band for a sentiment score in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            ScoreBand::VeryPositive
        } else if score > 0.3 {
            ScoreBand::Positive
        } else if score > -0.3 {
            ScoreBand::Neutral
        } else if score > -0.7 {
            ScoreBand::Negative
        } else {
            ScoreBand::VeryNegative
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoreBand::VeryPositive => "Very Positive",
            ScoreBand::Positive => "Positive",
            ScoreBand::Neutral => "Neutral",
            ScoreBand::Negative => "Negative",
            ScoreBand::VeryNegative => "Very Negative",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
