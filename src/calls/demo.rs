//! Demo calls the dashboard boots with

use super::types::{CallAnalysis, CallRecord, EmotionTag, Sentiment};
use crate::ingest::random::RandomSource;
use crate::ingest::synth::{build_segments, normalize_transcript, SegmentPolicy};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

struct DemoCall {
    filename: &'static str,
    duration_seconds: u64,
    /// Upload date falls within this many days before now
    max_days_ago: u64,
    transcript: &'static str,
    sentiment: Sentiment,
    score: f64,
    tags: &'static [EmotionTag],
    summary: &'static str,
    key_points: &'static [&'static str],
}

const DEMO_CALLS: [DemoCall; 3] = [
    DemoCall {
        filename: "customer_support_call_john.mp3",
        duration_seconds: 187,
        max_days_ago: 2,
        transcript: "Hello, thank you for calling customer support. How can I help you today? \
            Hi, I have a problem with my recent order. The item that arrived is not what I \
            ordered online. I am sorry about that. Could you give me your order number so I \
            can look into it? Sure, it is order 78921. Thanks, I can see the problem now. \
            There was a mix-up in our warehouse. I will ship the correct item right away and \
            you can keep the wrong one as an apology. That is great, thanks for sorting it out \
            so quickly. You should receive it within three business days, and we will email \
            you the tracking details. Thank you for your help, have a great day!",
        sentiment: Sentiment::Positive,
        score: 0.72,
        tags: &[EmotionTag::Happy, EmotionTag::Satisfied],
        summary: "Customer received the wrong product. The agent confirmed a warehouse \
            mix-up, shipped the correct item immediately and let the customer keep the \
            incorrect one.",
        key_points: &[
            "Customer received wrong product",
            "Agent identified warehouse mix-up",
            "Correct product to be shipped within 3 days",
            "Customer allowed to keep incorrect product",
            "Customer satisfied with resolution",
        ],
    },
    DemoCall {
        filename: "technical_support_printer_issue.wav",
        duration_seconds: 246,
        max_days_ago: 5,
        transcript: "Thank you for calling technical support, how can I assist you? Hi, my \
            printer keeps showing an error and will not print anything. I already tried \
            turning it off and on again. I understand, that is frustrating. Which model do \
            you have, and what does the error say? It is a LaserJet Pro and it says paper jam \
            in tray two, but there is no paper in there. That is sometimes a sensor issue. \
            Please open the rear access door and look for small scraps of paper. Oh, there is \
            a tiny piece stuck in the corner that I missed before. Great, remove it, then \
            unplug the printer for sixty seconds and plug it back in. Okay, it is starting \
            up, and the error is gone! Thank you so much. Glad we could solve it, call back \
            any time.",
        sentiment: Sentiment::Positive,
        score: 0.56,
        tags: &[
            EmotionTag::Frustrated,
            EmotionTag::Confused,
            EmotionTag::Satisfied,
            EmotionTag::TechnicalIssue,
        ],
        summary: "Printer reported a paper jam that the customer could not find. The agent \
            guided them to a scrap behind the rear access door and a power reset, which \
            resolved the error.",
        key_points: &[
            "Error message falsely indicating paper jam",
            "Customer had already tried basic troubleshooting",
            "Small paper piece found in rear mechanism",
            "Full power reset performed",
            "Issue resolved completely",
        ],
    },
    DemoCall {
        filename: "refund_request_delayed_shipment.mp3",
        duration_seconds: 178,
        max_days_ago: 10,
        transcript: "Thank you for calling customer service, how may I help you? I placed an \
            order two weeks ago and it still has not shipped. I need to cancel it and get a \
            refund because the event I needed it for has already passed. I apologize for the \
            delay. It looks like an inventory issue held up your order. I will process the \
            cancellation and a full refund right away. I ordered these well in advance, this \
            is unacceptable! You are right, we should have told you about the delay. I had \
            to buy replacements locally at a higher price. I understand. Along with the \
            refund I can add a fifty dollar store credit to cover the extra cost. I guess \
            that is better than nothing. The refund will appear in three to five business \
            days. Thank you for the refund.",
        sentiment: Sentiment::Negative,
        score: -0.45,
        tags: &[
            EmotionTag::Angry,
            EmotionTag::Frustrated,
            EmotionTag::AskedForRefund,
        ],
        summary: "Customer cancelled an order that had not shipped after two weeks and \
            missed the event it was for. The agent issued a full refund plus a store credit \
            to offset replacement costs.",
        key_points: &[
            "Order delayed due to inventory issues",
            "Customer missed event due to non-delivery",
            "Customer bought replacements at higher cost",
            "Full refund processed plus store credit",
            "Customer accepted resolution but remained dissatisfied",
        ],
    },
];

/// Build the demo calls, most recent first
pub fn demo_calls(
    policy: &SegmentPolicy,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> Vec<CallRecord> {
    DEMO_CALLS
        .iter()
        .map(|demo| {
            let days_ago = rng.range_inclusive(0, demo.max_days_ago.saturating_sub(1));
            let transcript = normalize_transcript(demo.transcript);
            let segments = build_segments(&transcript, demo.sentiment, policy, rng);

            CallRecord {
                id: Uuid::new_v4(),
                filename: demo.filename.to_string(),
                duration_seconds: demo.duration_seconds,
                uploaded_at: now - Duration::days(days_ago as i64),
                user_id: None,
                audio_url: None,
                transcript,
                segments,
                analysis: CallAnalysis {
                    overall_sentiment: demo.sentiment,
                    sentiment_score: demo.score,
                    emotion_tags: demo.tags.to_vec(),
                    summary: normalize_transcript(demo.summary),
                    key_points: demo.key_points.iter().map(|p| p.to_string()).collect(),
                },
            }
        })
        .collect()
}
