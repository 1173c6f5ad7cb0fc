//! Scrape job ingestion service.
//!
//! Owns the job lifecycle around the normalizer: a job is created pending,
//! started once the provider assigns a run, and completed when its dataset is
//! normalized and stored. Storage is reached only through the [`JobStore`]
//! and [`AdStore`] handles passed in by the caller.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{JobStatus, Platform, ScrapeJob, StoredAd};
use crate::normalize::{normalize_and_score, BatchStats};
use crate::repository::{AdStore, DieselError, JobStore};

/// Errors from ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Job not found: {0}")]
    JobNotFound(String),
    #[error("Job {0} is already completed")]
    AlreadyCompleted(String),
    #[error("Job {0} has not been started")]
    NotStarted(String),
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),
}

/// Status of a provider run as reported by the scrape provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
    Other(String),
}

impl ProviderRunStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "READY" => Self::Ready,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "TIMED-OUT" | "TIMED_OUT" => Self::TimedOut,
            "ABORTED" => Self::Aborted,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Lowercase status label for reporting.
    pub fn label(&self) -> String {
        match self {
            Self::Ready => "ready".to_string(),
            Self::Running => "running".to_string(),
            Self::Succeeded => "succeeded".to_string(),
            Self::Failed => "failed".to_string(),
            Self::TimedOut => "timed-out".to_string(),
            Self::Aborted => "aborted".to_string(),
            Self::Other(s) => s.to_lowercase(),
        }
    }

    /// Whether the run ended without producing a usable dataset.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut | Self::Aborted)
    }
}

/// Outcome of ingesting one provider dataset.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub job: ScrapeJob,
    /// Row ids of the stored ads, highest score first.
    pub inserted: Vec<String>,
    pub stats: BatchStats,
    pub skipped: usize,
}

/// What applying a provider run status did to the job.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RunOutcome {
    Ingested(IngestReport),
    Failed { job: ScrapeJob },
    /// Run still in progress; nothing changed.
    Pending { status: String },
}

/// Service coordinating jobs, normalization and storage.
pub struct IngestService<'a> {
    jobs: &'a dyn JobStore,
    ads: &'a dyn AdStore,
}

impl<'a> IngestService<'a> {
    pub fn new(jobs: &'a dyn JobStore, ads: &'a dyn AdStore) -> Self {
        Self { jobs, ads }
    }

    pub async fn create_job(
        &self,
        platform: Platform,
        search_query: &str,
    ) -> Result<ScrapeJob, IngestError> {
        let job = self.jobs.create_job(platform, search_query).await?;
        info!("Created {} job {} for '{}'", platform.as_str(), job.id, search_query);
        Ok(job)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<ScrapeJob, IngestError> {
        self.jobs
            .get_job(job_id)
            .await?
            .ok_or_else(|| IngestError::JobNotFound(job_id.to_string()))
    }

    /// Record the provider run for a job and mark it running.
    pub async fn start_job(&self, job_id: &str, run_id: &str) -> Result<ScrapeJob, IngestError> {
        let job = self.get_job(job_id).await?;
        if job.status == JobStatus::Completed {
            return Err(IngestError::AlreadyCompleted(job.id));
        }

        self.jobs.mark_running(job_id, run_id, Utc::now()).await?;
        info!("Job {} running as provider run {}", job_id, run_id);
        self.get_job(job_id).await
    }

    pub async fn fail_job(&self, job_id: &str) -> Result<ScrapeJob, IngestError> {
        self.get_job(job_id).await?;
        self.jobs.mark_failed(job_id, Utc::now()).await?;
        warn!("Job {} marked failed", job_id);
        self.get_job(job_id).await
    }

    /// Normalize a provider dataset, store it, and complete the job.
    ///
    /// The job must have been started: its ads are found later by
    /// `scraped_at >= started_at`.
    pub async fn ingest_batch(
        &self,
        job_id: &str,
        raw_items: &[Value],
    ) -> Result<IngestReport, IngestError> {
        let job = self.get_job(job_id).await?;
        if job.status == JobStatus::Completed {
            return Err(IngestError::AlreadyCompleted(job.id));
        }
        if job.started_at.is_none() {
            return Err(IngestError::NotStarted(job.id));
        }

        let batch = normalize_and_score(raw_items, job.platform, &job.id);
        if batch.skipped > 0 {
            warn!("Job {}: skipped {} malformed entries", job.id, batch.skipped);
        }

        let inserted = match self.ads.insert_ads(&batch.ads).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Job {}: failed to store ads: {}", job.id, e);
                if let Err(mark_err) = self.jobs.mark_failed(&job.id, Utc::now()).await {
                    error!("Job {}: failed to mark failed: {}", job.id, mark_err);
                }
                return Err(e.into());
            }
        };

        let total_found = u32::try_from(raw_items.len()).unwrap_or(u32::MAX);
        self.jobs
            .mark_completed(&job.id, total_found, Utc::now())
            .await?;

        info!(
            "Job {} completed: {} ads stored, top score {}",
            job.id,
            inserted.len(),
            batch.stats.top_performer.as_ref().map_or(0, |t| t.score)
        );

        Ok(IngestReport {
            job: self.get_job(job_id).await?,
            inserted,
            stats: batch.stats,
            skipped: batch.skipped,
        })
    }

    /// Apply a provider run status to a job.
    ///
    /// A succeeded run ingests `raw_items`; failed, aborted or timed-out runs
    /// fail the job; anything else leaves the job untouched.
    pub async fn apply_run_status(
        &self,
        job_id: &str,
        status: ProviderRunStatus,
        raw_items: &[Value],
    ) -> Result<RunOutcome, IngestError> {
        match status {
            ProviderRunStatus::Succeeded => {
                Ok(RunOutcome::Ingested(self.ingest_batch(job_id, raw_items).await?))
            }
            s if s.is_failure() => Ok(RunOutcome::Failed {
                job: self.fail_job(job_id).await?,
            }),
            other => {
                self.get_job(job_id).await?;
                Ok(RunOutcome::Pending {
                    status: other.label(),
                })
            }
        }
    }

    /// Ads that belong to a job: those scraped since the job started.
    pub async fn job_ads(&self, job_id: &str) -> Result<Vec<StoredAd>, IngestError> {
        let job = self.get_job(job_id).await?;
        match job.started_at {
            Some(started_at) => Ok(self.ads.list_ads_since(started_at).await?),
            None => Ok(Vec::new()),
        }
    }
}

/// Parse a provider dataset.
///
/// Accepts a bare JSON array of items, or an object carrying the array under
/// `items` or `data`.
pub fn parse_batch(json_text: &str) -> Result<Vec<Value>, IngestError> {
    let value: Value =
        serde_json::from_str(json_text).map_err(|e| IngestError::InvalidBatch(e.to_string()))?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => ["items", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                IngestError::InvalidBatch("expected an `items` or `data` array".to_string())
            }),
        _ => Err(IngestError::InvalidBatch(
            "expected a JSON array of ad items".to_string(),
        )),
    }
}

/// Facebook Ad Library keyword search URL for a query.
pub fn library_search_url(query: &str, country: &str) -> String {
    format!(
        "https://www.facebook.com/ads/library/?active_status=all&ad_type=all&country={}&q={}&search_type=keyword_unordered&media_type=all",
        urlencoding::encode(country),
        urlencoding::encode(query)
    )
}
