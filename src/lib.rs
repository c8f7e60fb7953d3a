pub mod analytics;
pub mod calls;
pub mod config;
pub mod ingest;

pub use calls::{
    AudioUpload, CallAnalysis, CallFilter, CallRecord, CallStore, CallsSnapshot, EmotionTag,
    Segment, Sentiment,
};
pub use config::AppConfig;
pub use ingest::{CancelToken, IngestEvent, IngestHandle, IngestPhase};

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallInsightError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("An ingestion is already in progress")]
    Busy,

    #[error("Call not found: {0}")]
    NotFound(Uuid),

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for CallInsightError {
    fn from(e: std::io::Error) -> Self {
        CallInsightError::IOError(e.to_string())
    }
}

impl CallInsightError {
    /// Check if this error is recoverable
    ///
    /// Store operations never leave the store unusable; only startup
    /// problems (config, filesystem) need user intervention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CallInsightError::InvalidInput(_) => true,
            CallInsightError::Busy => true,
            CallInsightError::NotFound(_) => true,
            CallInsightError::Cancelled => true,
            CallInsightError::PipelineError(_) => true,
            CallInsightError::ConfigError(_) => false,
            CallInsightError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            CallInsightError::InvalidInput(_) => {
                "Invalid file. Please upload an audio file (MP3 or WAV).".to_string()
            }
            CallInsightError::Busy => {
                "Another upload is still processing. Please wait for it to finish.".to_string()
            }
            CallInsightError::NotFound(_) => "That call no longer exists.".to_string(),
            CallInsightError::Cancelled => "Upload cancelled.".to_string(),
            CallInsightError::PipelineError(_) => {
                "Processing failed. Please try again.".to_string()
            }
            CallInsightError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            CallInsightError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CallInsightError>;
