pub mod demo;
pub mod search;
pub mod storage;
pub mod types;

pub use demo::demo_calls;
pub use search::{filter_calls, CallFilter};
pub use storage::{CallStore, CallsSnapshot};
pub use types::{AudioUpload, CallAnalysis, CallRecord, EmotionTag, Segment, Sentiment};
