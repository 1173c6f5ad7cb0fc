//! Scrape job models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Platform;

/// Lifecycle state of a scrape job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One search/collection request against an ad platform.
///
/// A job owns the batch of ads normalized from its provider run. Ads are not
/// linked by foreign key; they belong to the job when their `scraped_at`
/// falls on or after the job's `started_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub id: String,
    /// Run identifier assigned by the scrape provider once started.
    pub provider_run_id: Option<String>,
    pub platform: Platform,
    pub search_query: String,
    pub status: JobStatus,
    pub total_ads_found: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScrapeJob {
    /// Create a new pending job.
    pub fn new(platform: Platform, search_query: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            provider_run_id: None,
            platform,
            search_query,
            status: JobStatus::Pending,
            total_ads_found: 0,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_pending() {
        let job = ScrapeJob::new(Platform::Facebook, "running shoes".to_string());
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.started_at.is_none());
        assert_eq!(job.total_ads_found, 0);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert_eq!(JobStatus::from_str("failed"), Some(JobStatus::Failed));
    }
}
