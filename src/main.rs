use anyhow::{Context, Result};
use callinsight::analytics::{format_duration, CallReport, ScoreBand};
use callinsight::{AppConfig, AudioUpload, CallStore, IngestEvent};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Usage: callinsight [CONFIG.toml] [UPLOAD_NAME]
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "callinsight=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => AppConfig::default().with_demo_calls(),
    };
    let upload_name = args.next().unwrap_or_else(|| "demo.mp3".to_string());

    info!("Starting callinsight");

    let seed_demo = config.seed_demo_calls;
    let mut store = CallStore::with_config(config);
    if seed_demo {
        store = store.with_demo_calls();
    }
    info!("Store ready with {} calls", store.len());

    let events = store.subscribe();
    let logger = std::thread::spawn(move || {
        for event in events.iter() {
            match event {
                IngestEvent::Started { filename } => info!("Upload started: {}", filename),
                IngestEvent::Progress(pct) => info!("Uploading... {}%", pct),
                IngestEvent::Synthesizing => info!("Analyzing call"),
                IngestEvent::Completed(id) => {
                    info!("Analysis complete: {}", id);
                    break;
                }
                IngestEvent::Cancelled => {
                    info!("Upload cancelled");
                    break;
                }
            }
        }
    });

    let record = store
        .ingest(AudioUpload::new(upload_name, "audio/mpeg", 3 * 1024 * 1024))
        .context("ingestion failed")?;
    logger
        .join()
        .map_err(|_| anyhow::anyhow!("event logger thread panicked"))?;

    info!(
        "{} | {} | {} ({:.2})",
        record.filename,
        format_duration(record.duration_seconds),
        ScoreBand::from_score(record.analysis.sentiment_score),
        record.analysis.sentiment_score
    );

    let report = CallReport::from_calls(&store.calls());
    info!("{}", report.summary());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
