//! alert-worker: applies detection rules and alert triggers to a bucket stream.
//!
//! Reads buckets as newline-delimited JSON from a file or stdin, drops the
//! records each job's detection rules filter, evaluates the job's alert
//! triggers, and delivers fired alerts as JSON lines on stdout.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use bucketwatch_core::config::{load_dotenv, EngineConfig};
use bucketwatch_core::{read_buckets, CoreError};
use bucketwatch_notify::{
    run_delivery, AlertDelivery, AlertTemplates, ChannelSink, Dispatcher, JsonLinesDelivery,
    LogSink,
};
use bucketwatch_rules::loader::LoadStatus;
use bucketwatch_rules::{AlertObserver, AlertSink, RuleLoader, RuleSnapshot};

// ── CLI ─────────────────────────────────────────────────────────────

/// Filter anomaly buckets and raise alerts.
#[derive(Parser, Debug)]
#[command(name = "alert-worker", version, about)]
struct Cli {
    /// NDJSON bucket file; reads stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Directory holding JobRules / ValueList documents.
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Hot-reload documents while running.
    #[arg(long)]
    watch: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    /// Configuration profile (prefix for environment keys).
    #[arg(long, env = "BUCKETWATCH_PROFILE")]
    profile: Option<String>,
}

#[derive(Debug, Default)]
struct RunStats {
    buckets: usize,
    unknown_job: usize,
    malformed: usize,
    suppressed: usize,
    fired: usize,
}

/// Per-job observer plus the snapshot its triggers came from.
struct JobObserver {
    source: Arc<RuleSnapshot>,
    observer: AlertObserver,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    let mut config = match cli.profile.as_deref() {
        Some(profile) => EngineConfig::for_profile(profile),
        None => EngineConfig::from_env(),
    };
    if let Some(dir) = &cli.rules_dir {
        config.rules.dir = dir.clone();
    }
    config.rules.watch |= cli.watch;
    config.logging.json |= cli.log_json;

    init_tracing(config.logging.json);
    config.log_summary();

    let templates = AlertTemplates::from_config(&config.alerts).context("invalid alert template")?;

    let mut loader = RuleLoader::new(config.rules.dir.clone());
    let results = loader.load_all().context("failed to scan rules directory")?;
    let failed = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Failed { .. }))
        .count();
    if failed > 0 {
        warn!(failed, "some documents failed to load and are inactive");
    }
    info!(jobs = loader.snapshot().job_count(), "rules loaded");
    if config.rules.watch {
        loader.watch().context("failed to watch rules directory")?;
    }

    let (channel_sink, rx) = ChannelSink::new();
    let delivery = tokio::spawn(async move {
        let channels: Vec<Box<dyn AlertDelivery>> = vec![Box::new(JsonLinesDelivery::stdout())];
        run_delivery(rx, channels).await
    });

    let dispatcher = Dispatcher::with_defaults(vec![
        Arc::new(LogSink::new(templates)) as Arc<dyn AlertSink>,
        Arc::new(channel_sink) as Arc<dyn AlertSink>,
    ]);

    let input = cli.input.clone();
    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<RunStats> {
        let reader: Box<dyn BufRead> = match &input {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
            )),
            None => Box::new(BufReader::new(io::stdin())),
        };
        // The loader stays alive here so its watcher keeps running.
        process(reader, &loader, &dispatcher)
    })
    .await??;

    // Dispatcher (and with it the channel sender) is dropped; drain the rest.
    let delivered = delivery.await?;

    info!(
        buckets = stats.buckets,
        unknown_job = stats.unknown_job,
        malformed = stats.malformed,
        suppressed = stats.suppressed,
        fired = stats.fired,
        delivered = delivered.delivered,
        delivery_failures = delivered.failed,
        "alert-worker finished"
    );
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stdout carries alerts, so logs go to stderr.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

fn process(
    reader: Box<dyn BufRead>,
    loader: &RuleLoader,
    sink: &dyn AlertSink,
) -> anyhow::Result<RunStats> {
    let mut stats = RunStats::default();
    let mut observers: HashMap<String, JobObserver> = HashMap::new();

    for bucket in read_buckets(reader) {
        let bucket = match bucket {
            Ok(bucket) => bucket,
            Err(e @ CoreError::Json { .. }) => {
                warn!(error = %e, "skipping malformed bucket");
                stats.malformed += 1;
                continue;
            }
            Err(e) => return Err(e).context("failed to read bucket input"),
        };
        stats.buckets += 1;

        let snapshot = loader.snapshot();
        let Some(job) = snapshot.job(&bucket.job_id) else {
            debug!(job_id = %bucket.job_id, "no active rules for job, skipping bucket");
            stats.unknown_job += 1;
            continue;
        };

        let outcome = match snapshot.result_filter(&bucket.job_id) {
            Some(filter) => filter.apply(&bucket),
            None => continue,
        };
        stats.suppressed += outcome.suppressed;

        let entry = observers
            .entry(bucket.job_id.clone())
            .or_insert_with(|| JobObserver {
                source: Arc::clone(&snapshot),
                observer: AlertObserver::new(job.job_id(), job.alert_triggers.clone()),
            });
        if !Arc::ptr_eq(&entry.source, &snapshot) {
            entry.observer.replace_triggers(job.alert_triggers.clone());
            entry.source = Arc::clone(&snapshot);
        }

        stats.fired += entry.observer.observe(&outcome.bucket, sink);
    }

    Ok(stats)
}
