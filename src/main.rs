//! Summary report over judgment session files
//!
//! **Usage:**
//! ```bash
//! judgment-report [FILES]... [--local-dir <DIR>] [--config <FILE>]
//!     [--merge-participants] [--export <FILE>] [--parquet <FILE>]
//!     [--json] [--clear-local]
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use judgment_analytics::format::{condition_label, ResultFormatter};
use judgment_analytics::kv::{FileKvStore, LocalSessionSlot};
use judgment_analytics::stats::AnalyticsReport;
use judgment_analytics::{AnalyticsConfig, Analyzer, ParticipantMergePolicy};

/// Aggregate grammaticality judgment sessions
#[derive(Parser, Debug)]
#[command(name = "judgment-report", version)]
#[command(about = "Aggregate grammaticality judgment sessions into summary statistics")]
struct Args {
    /// Session JSON files to import
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory holding the persisted local session slot
    #[arg(long, value_name = "DIR")]
    local_dir: Option<PathBuf>,

    /// Analytics configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fold sessions sharing a participant ID into one row
    #[arg(long)]
    merge_participants: bool,

    /// Write the export document to FILE
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Write every trial as a Parquet table to FILE
    #[arg(long, value_name = "FILE")]
    parquet: Option<PathBuf>,

    /// Print the full report as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Forget the persisted local session after reporting
    #[arg(long, requires = "local_dir")]
    clear_local: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &AnalyticsReport, formatter: &ResultFormatter) {
    let global = &report.global_stats;
    println!("=== Judgment Sessions ===");
    println!(
        "Sessions: {}   Trials: {}",
        global.total_participants, global.total_trials
    );
    println!(
        "Accuracy: {}   Mean RT: {}",
        formatter.percentage(global.accuracy_pct),
        formatter.response_time(global.avg_response_time_ms)
    );

    if !report.condition_stats.is_empty() {
        println!();
        println!("Conditions:");
        for stats in &report.condition_stats {
            println!(
                "  {:<26} {:>5} trials  {:>7}  {}",
                condition_label(stats.condition),
                stats.trials,
                formatter.percentage(stats.accuracy_pct),
                formatter.mean_ms(stats.avg_response_time_ms)
            );
        }
    }

    if !report.participant_stats.is_empty() {
        println!();
        println!("Participants:");
        for stats in &report.participant_stats {
            println!(
                "  {:<16} {:<8} {:>5} trials  {:>7}  {}",
                stats.participant_id,
                stats.language_group.as_deref().unwrap_or("-"),
                stats.total_trials,
                formatter.percentage(stats.accuracy_pct),
                formatter.mean_ms(stats.avg_response_time_ms)
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalyticsConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };
    let mut builder = Analyzer::builder().config(config);
    if args.merge_participants {
        builder = builder.merge_policy(ParticipantMergePolicy::MergeById);
    }
    let mut analyzer = builder.build()?;

    let slot = args
        .local_dir
        .as_ref()
        .map(|dir| LocalSessionSlot::from_config(FileKvStore::new(dir), analyzer.config()));

    if let Some(slot) = &slot {
        if let Err(e) = analyzer.restore_local(slot).await {
            warn!(error = %e, "ignoring persisted local session");
        }
    }

    let summary = analyzer.import_files(&args.files).await;
    for failure in &summary.failures {
        eprintln!("skipped {}: {}", failure.source_label, failure.error);
    }

    let report = analyzer.report();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        print_summary(&report, &ResultFormatter::from_config(analyzer.config()));
    }

    if let Some(path) = &args.export {
        analyzer
            .export(Utc::now())
            .write_to(path)
            .with_context(|| format!("failed to write export {}", path.display()))?;
    }

    if let Some(path) = &args.parquet {
        analyzer
            .trial_table()?
            .write_parquet(path)
            .with_context(|| format!("failed to write Parquet table {}", path.display()))?;
    }

    if args.clear_local {
        if let Some(slot) = &slot {
            let removed = analyzer.clear_all(slot).await?;
            info!(removed, "local session forgotten");
        }
    }

    Ok(())
}
