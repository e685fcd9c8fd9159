//! BuckTrax batch prediction runner
//!
//! Reads property snapshots exported by the storage layer, computes
//! predictions for every property in parallel and writes the results as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use bucktrax_backend::batch::{run_snapshot, PropertyReport, SnapshotInput};
use bucktrax_backend::config::LogFormat;
use bucktrax_backend::error::ErrorDetail;
use bucktrax_backend::Config;
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "bucktrax", about = "Deer movement predictions from trail camera data")]
struct Args {
    /// JSON file with one property snapshot or a list of them
    #[arg(short, long, env = "BUCKTRAX_INPUT")]
    input: PathBuf,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference date for season resolution (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PropertyOutcome {
    Report(Box<PropertyReport>),
    Failed { property_id: Uuid, error: ErrorDetail },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bucktrax=info,bucktrax_backend=info".into());
    match config.log.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Starting BuckTrax batch prediction");
    tracing::info!("Environment: {}", config.environment);

    let raw = tokio::fs::read_to_string(&args.input).await?;
    let mut snapshots = serde_json::from_str::<SnapshotInput>(&raw)?.into_snapshots();
    if let Some(date) = args.date {
        for snapshot in snapshots.iter_mut() {
            snapshot.request.reference_date.get_or_insert(date);
        }
    }
    tracing::info!("Loaded {} property snapshots", snapshots.len());

    // Properties are independent; compute them on the blocking pool
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();
    for (index, snapshot) in snapshots.into_iter().enumerate() {
        let config = Arc::clone(&config);
        tasks.spawn_blocking(move || {
            let property_id = snapshot.request.property_id;
            let outcome = match run_snapshot(snapshot, &config) {
                Ok(report) => PropertyOutcome::Report(Box::new(report)),
                Err(e) => {
                    tracing::error!("Prediction failed for property {}: {}", property_id, e);
                    PropertyOutcome::Failed {
                        property_id,
                        error: e.detail(),
                    }
                }
            };
            (index, outcome)
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined?);
    }
    outcomes.sort_by_key(|(index, _)| *index);
    let outcomes: Vec<PropertyOutcome> = outcomes.into_iter().map(|(_, o)| o).collect();

    let json = serde_json::to_string_pretty(&outcomes)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!("Wrote {} results to {}", outcomes.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
