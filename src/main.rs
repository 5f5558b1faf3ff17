use std::process::ExitCode;

use alarm_reconciler::{
    context::RunContext,
    http_client::{create_retryable_http_client, HttpRetryConfig},
    loader::{ConfigLoader, ConfigSource, LoaderError},
    models::ReconciliationReport,
    provider::CloudWatchProvider,
    reconciler::Reconciler,
    region::{resolve_region, RegionError},
    resolver::ResolverError,
};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about = "Create or update CloudWatch alarms with a given name prefix")]
struct Cli {
    /// Alarm name prefix, e.g. com.ft.up.semantic-data.neo4j
    #[arg(long)]
    alarmprefix: String,

    /// Metric namespace override applied to every entry
    #[arg(long)]
    namespace: Option<String>,

    /// Deprecated; alarm identity is extracted from dimensions
    #[arg(long)]
    instanceid: Option<String>,

    /// ARN of the SNS topic to send alerts to, replacing per-entry actions
    #[arg(long)]
    topic: Option<String>,

    /// File path or URL of the alarm configuration document
    #[arg(long)]
    config: Option<String>,

    /// AWS region; discovered via instance metadata when omitted
    #[arg(long)]
    region: Option<String>,
}

#[derive(Debug, Error)]
enum Error {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Region discovery error: {0}")]
    Region(#[from] RegionError),
    #[error("Configuration error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Resolution error: {0}")]
    Resolver(#[from] ResolverError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) if report.all_succeeded() => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::error!(
                failed = report.failed_count(),
                total = report.outcomes.len(),
                "Some alarms could not be created"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Error while creating alarms");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ReconciliationReport, Error> {
    if cli.instanceid.is_some() {
        tracing::warn!(
            "--instanceid is deprecated; unique characteristics of an alarm are now \
             extracted from its dimensions"
        );
    }

    let http_client = create_retryable_http_client(&HttpRetryConfig::default())?;

    let region = resolve_region(cli.region, &http_client).await?;
    tracing::debug!(region = %region, "Region resolved");

    let context = RunContext {
        alarm_prefix: cli.alarmprefix,
        namespace: cli.namespace,
        topic: cli.topic,
        region: region.clone(),
    };

    let source = cli.config.as_deref().map(ConfigSource::parse).unwrap_or_default();
    tracing::info!(source = ?source, "Loading alarm configuration");
    let entries = ConfigLoader::new(source, http_client).load().await?;
    tracing::info!(entries = entries.len(), "Configuration loaded");

    let provider = CloudWatchProvider::new(&region).await;
    let report = Reconciler::new(provider).run(&context, &entries).await?;
    Ok(report)
}
