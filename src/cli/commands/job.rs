//! Scrape job commands.

use std::path::Path;

use console::style;

use crate::config::Settings;
use crate::models::{JobStatus, Platform};
use crate::repository::JobStore;
use crate::services::{library_search_url, parse_batch, IngestService, ProviderRunStatus, RunOutcome};

use super::super::helpers::{open_stores, truncate};
use super::ingest::print_report;

fn status_style(status: JobStatus) -> console::StyledObject<&'static str> {
    let label = status.as_str();
    match status {
        JobStatus::Pending => style(label).dim(),
        JobStatus::Running => style(label).cyan(),
        JobStatus::Completed => style(label).green(),
        JobStatus::Failed => style(label).red(),
    }
}

/// Create a pending job and print the library search it targets.
pub async fn cmd_job_create(
    settings: &Settings,
    platform: Platform,
    query: &str,
    country: &str,
) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);
    let job = service.create_job(platform, query).await?;

    println!("{} Created job {}", style("✓").green(), style(&job.id).bold());
    if platform == Platform::Facebook {
        println!("  Search URL: {}", library_search_url(query, country));
    }
    Ok(())
}

pub async fn cmd_job_start(settings: &Settings, job_id: &str, run_id: &str) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);
    let job = service.start_job(job_id, run_id).await?;

    println!(
        "{} Job {} is {} (run {})",
        style("→").cyan(),
        job.id,
        status_style(job.status),
        run_id
    );
    Ok(())
}

/// Apply a provider run status, ingesting the dataset when the run succeeded.
pub async fn cmd_job_status(
    settings: &Settings,
    job_id: &str,
    status: &str,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let status = ProviderRunStatus::parse(status);
    let raw_items = match (&status, file) {
        (ProviderRunStatus::Succeeded, Some(path)) => parse_batch(&tokio::fs::read_to_string(path).await?)?,
        (ProviderRunStatus::Succeeded, None) => {
            anyhow::bail!("--file is required when the run succeeded")
        }
        _ => Vec::new(),
    };

    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);

    match service.apply_run_status(job_id, status, &raw_items).await? {
        RunOutcome::Ingested(report) => print_report(&report),
        RunOutcome::Failed { job } => {
            println!("{} Job {} {}", style("✗").red(), job.id, status_style(job.status));
        }
        RunOutcome::Pending { status } => {
            println!("{} Provider run is {}", style("…").yellow(), status);
        }
    }
    Ok(())
}

pub async fn cmd_job_fail(settings: &Settings, job_id: &str) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);
    let job = service.fail_job(job_id).await?;

    println!("{} Job {} {}", style("✗").red(), job.id, status_style(job.status));
    Ok(())
}

/// List jobs, newest first.
pub async fn cmd_job_list(settings: &Settings) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let jobs = stores.jobs.list_jobs().await?;

    if jobs.is_empty() {
        println!(
            "{} No jobs yet. Create one with 'adscope job create'.",
            style("!").yellow()
        );
        return Ok(());
    }

    println!("\n{}", style("Scrape Jobs").bold());
    println!("{}", "-".repeat(96));
    println!(
        "{:<36} {:<9} {:<10} {:>6}  {:<16} Query",
        "ID", "Platform", "Status", "Ads", "Created"
    );
    println!("{}", "-".repeat(96));

    for job in jobs {
        println!(
            "{:<36} {:<9} {:<10} {:>6}  {:<16} {}",
            job.id,
            job.platform.as_str(),
            status_style(job.status),
            job.total_ads_found,
            job.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&job.search_query, 30)
        );
    }

    Ok(())
}

/// Show a job and the ads stored since it started.
pub async fn cmd_job_show(settings: &Settings, job_id: &str) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let service = IngestService::new(&stores.jobs, &stores.ads);
    let job = service.get_job(job_id).await?;
    let ads = service.job_ads(job_id).await?;

    println!("\n{} {}", style("Job").bold(), job.id);
    println!("  Platform:   {}", job.platform.as_str());
    println!("  Query:      {}", job.search_query);
    println!("  Status:     {}", status_style(job.status));
    if let Some(run_id) = &job.provider_run_id {
        println!("  Run:        {}", run_id);
    }
    if let Some(started) = job.started_at {
        println!("  Started:    {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(completed) = job.completed_at {
        println!("  Completed:  {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  Ads found:  {}", job.total_ads_found);

    if !ads.is_empty() {
        println!("\n{:<36} {:>5}  {:<6} {:<24} Title", "ID", "Score", "Type", "Advertiser");
        for stored in ads {
            println!(
                "{:<36} {:>5}  {:<6} {:<24} {}",
                stored.id,
                stored.ad.performance_score,
                stored.ad.ad_type.as_str(),
                truncate(&stored.ad.advertiser_name, 23),
                truncate(&stored.ad.title, 40)
            );
        }
    }

    Ok(())
}
