//! synthesis-runner: score a portfolio snapshot and write the synthesis report.
//!
//! Reads the joined per-holding records produced by the upstream
//! technical/fundamental/sentiment collaborators, runs the confidence
//! engine over the batch, and writes the report JSON. Optionally merges
//! per-ticker fundamentals from a directory and appends each run to an
//! append-only archive.
//!
//! Usage:
//!   cargo run -p synthesis-runner -- --input daily_report.json
//!   cargo run -p synthesis-runner -- --input daily_report.json --fundamentals-dir fundamentals
//!   cargo run -p synthesis-runner -- --input daily_report.json --config scoring.json --archive reports/archive.jsonl

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use confidence_engine::SynthesisEngine;
use portfolio_reducer::build_report;
use synthesis_core::{FundamentalRecord, HoldingSnapshot, ScoringConfig, SynthesisReport};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "synthesis_runner=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let input = flag_value(&args, "--input").unwrap_or_else(|| "daily_report.json".to_string());
    let output =
        flag_value(&args, "--output").unwrap_or_else(|| "synthesis_report.json".to_string());
    let config_path = flag_value(&args, "--config");
    let fundamentals_dir = flag_value(&args, "--fundamentals-dir");
    let archive = flag_value(&args, "--archive");

    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading scoring config {path}"))?;
            serde_json::from_str::<ScoringConfig>(&text)
                .with_context(|| format!("parsing scoring config {path}"))?
        }
        None => ScoringConfig::default(),
    };

    let mut snapshots = load_snapshots(Path::new(&input))?;
    tracing::info!("Loaded {} holdings from {}", snapshots.len(), input);

    if let Some(dir) = fundamentals_dir {
        merge_fundamentals(&mut snapshots, Path::new(&dir));
    }

    let engine = SynthesisEngine::new(config)?;
    let outcome = engine.evaluate_batch(&snapshots);
    let report = build_report(outcome.results, outcome.failures, Utc::now());

    fs::write(&output, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {output}"))?;

    let summary = &report.summary;
    tracing::info!(
        "Wrote {} ({} holdings, {} failures)",
        output,
        summary.total_holdings,
        report.failures.len(),
    );
    if let Some(avg) = summary.average_confidence {
        tracing::info!(
            "Average confidence {:.1}/10 | {} bullish / {} bearish / {} neutral | sell candidates: {}",
            avg,
            summary.bullish,
            summary.bearish,
            summary.neutral,
            report.sell_candidates().count(),
        );
    } else {
        tracing::warn!("No holdings scored - summary has no average");
    }

    if let Some(path) = archive {
        append_archive(Path::new(&path), &report)?;
    }

    Ok(())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Accepts either a bare JSON array of holding snapshots or a report
/// object carrying them under a `holdings` field.
fn load_snapshots(path: &Path) -> anyhow::Result<Vec<HoldingSnapshot>> {
    #[derive(serde::Deserialize)]
    struct SnapshotDocument {
        holdings: Vec<HoldingSnapshot>,
    }

    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if let Ok(list) = serde_json::from_str::<Vec<HoldingSnapshot>>(&text) {
        return Ok(list);
    }
    let document: SnapshotDocument =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(document.holdings)
}

/// Fill in missing fundamental records from per-ticker files
/// (`<dir>/<TICKER>.json`). A snapshot that already carries fundamentals
/// keeps them; unreadable files are skipped with a warning.
fn merge_fundamentals(snapshots: &mut [HoldingSnapshot], dir: &Path) {
    let mut merged = 0;
    for snapshot in snapshots.iter_mut() {
        if snapshot.fundamental.is_some() {
            continue;
        }
        let path = dir.join(format!("{}.json", snapshot.technical.ticker));
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        match serde_json::from_str::<FundamentalRecord>(&text) {
            Ok(record) => {
                snapshot.fundamental = Some(record);
                merged += 1;
            }
            Err(e) => {
                tracing::warn!("Ignoring unparseable fundamentals {}: {}", path.display(), e);
            }
        }
    }
    tracing::info!("Merged fundamentals for {} holdings from {}", merged, dir.display());
}

/// Append the run to the cross-run archive, one JSON document per line.
fn append_archive(path: &Path, report: &SynthesisReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening archive {}", path.display()))?;
    writeln!(file, "{}", serde_json::to_string(report)?)?;
    tracing::info!("Archived run to {}", path.display());
    Ok(())
}
