//! Ingest and dry-run normalization commands.

use std::path::Path;

use console::style;

use crate::config::Settings;
use crate::models::Platform;
use crate::normalize::normalize_and_score;
use crate::services::{parse_batch, IngestReport, IngestService};

use super::super::helpers::{open_stores, truncate};

pub(super) fn print_report(report: &IngestReport) {
    let stats = &report.stats;
    println!(
        "{} Job {} completed: {} ads stored",
        style("✓").green(),
        report.job.id,
        report.inserted.len()
    );
    if report.skipped > 0 {
        println!("  {} Skipped {} malformed entries", style("!").yellow(), report.skipped);
    }
    println!(
        "  Active: {}  Video: {}  Image: {}",
        stats.active_ads, stats.video_count, stats.image_count
    );
    println!(
        "  Avg active hours: {}  Avg variants: {:.1}",
        stats.average_active_hours, stats.average_variants
    );
    if let Some(top) = &stats.top_performer {
        println!(
            "  Top performer: {} ({}) score {}",
            top.id,
            truncate(&top.title, 40),
            style(top.score).bold()
        );
    }
}

/// Ingest a provider dataset file under a job.
pub async fn cmd_ingest(settings: &Settings, job_id: &str, file: &Path, json: bool) -> anyhow::Result<()> {
    let raw_items = parse_batch(&tokio::fs::read_to_string(file).await?)?;

    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);
    let report = service.ingest_batch(job_id, &raw_items).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Normalize a dataset without touching the database.
pub async fn cmd_normalize(file: &Path, platform: Platform) -> anyhow::Result<()> {
    let raw_items = parse_batch(&tokio::fs::read_to_string(file).await?)?;
    let batch = normalize_and_score(&raw_items, platform, "dry-run");
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
