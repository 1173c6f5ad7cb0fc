//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! against SQLite. Services depend on the [`JobStore`] and [`AdStore`]
//! traits rather than on the Diesel repositories directly.

pub mod diesel_ad;
pub mod diesel_job;
pub mod diesel_models;
pub mod diesel_pool;
pub mod migrations;

pub use diesel_ad::DieselAdRepository;
pub use diesel_job::DieselJobRepository;
pub use diesel_models::{AdRecord, JobRecord, NewAd, NewJob};
pub use diesel_pool::{create_diesel_pool, create_diesel_pool_from_url, DieselError, SqlitePool};
pub use migrations::run_migrations;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{AdAnalysis, NormalizedAd, Platform, ScrapeJob, StoredAd};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse an optional datetime string from the database.
pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

/// Format a datetime for storage.
///
/// Fixed width with a `Z` suffix so that text comparison in SQL matches
/// chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Filter for listing stored ads.
#[derive(Debug, Clone, Default)]
pub struct AdFilter {
    /// Only ads that have an analysis attached.
    pub analyzed_only: bool,
    pub platform: Option<Platform>,
    pub limit: Option<i64>,
}

/// Persistence for scrape jobs.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create and persist a new pending job.
    async fn create_job(
        &self,
        platform: Platform,
        search_query: &str,
    ) -> Result<ScrapeJob, DieselError>;

    async fn get_job(&self, id: &str) -> Result<Option<ScrapeJob>, DieselError>;

    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<ScrapeJob>, DieselError>;

    async fn mark_running(
        &self,
        id: &str,
        provider_run_id: &str,
        started_at: DateTime<Utc>,
    ) -> Result<bool, DieselError>;

    async fn mark_completed(
        &self,
        id: &str,
        total_ads_found: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, DieselError>;

    async fn mark_failed(&self, id: &str, completed_at: DateTime<Utc>)
        -> Result<bool, DieselError>;
}

/// Persistence for normalized ads.
#[async_trait]
pub trait AdStore: Send + Sync {
    /// Insert every ad in one transaction. Returns the generated row ids in
    /// input order.
    async fn insert_ads(&self, ads: &[NormalizedAd]) -> Result<Vec<String>, DieselError>;

    async fn get_ad(&self, id: &str) -> Result<Option<StoredAd>, DieselError>;

    /// Ads matching `filter`, most recently scraped first.
    async fn list_ads(&self, filter: &AdFilter) -> Result<Vec<StoredAd>, DieselError>;

    /// Ads scraped at or after `since`, highest score first.
    async fn list_ads_since(&self, since: DateTime<Utc>) -> Result<Vec<StoredAd>, DieselError>;

    /// Attach an analysis to a stored ad. Returns false if the ad is unknown.
    async fn save_analysis(&self, id: &str, analysis: &AdAnalysis) -> Result<bool, DieselError>;

    async fn count_ads(&self) -> Result<u64, DieselError>;
}
