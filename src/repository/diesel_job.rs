//! Diesel-based scrape job repository for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use super::diesel_models::{JobRecord, NewJob};
use super::diesel_pool::{run_blocking, DieselError, SqlitePool};
use super::{format_datetime, parse_datetime, parse_datetime_opt, JobStore};
use crate::models::{JobStatus, Platform, ScrapeJob};
use crate::schema::scraping_jobs;

/// Convert a database record to a domain model.
impl From<JobRecord> for ScrapeJob {
    fn from(record: JobRecord) -> Self {
        let platform = Platform::from_str(&record.platform).unwrap_or_else(|| {
            warn!("Job {} has unknown platform '{}'", record.id, record.platform);
            Platform::Facebook
        });
        ScrapeJob {
            id: record.id,
            provider_run_id: record.provider_run_id,
            platform,
            search_query: record.search_query,
            status: JobStatus::from_str(&record.status).unwrap_or(JobStatus::Pending),
            total_ads_found: u32::try_from(record.total_ads_found).unwrap_or(0),
            started_at: parse_datetime_opt(record.started_at),
            completed_at: parse_datetime_opt(record.completed_at),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Diesel-based scrape job repository.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: SqlitePool,
}

impl DieselJobRepository {
    /// Create a new Diesel job repository with an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn set_status(
        &self,
        id: &str,
        status: JobStatus,
        completed_at: DateTime<Utc>,
        total_ads_found: Option<u32>,
    ) -> Result<bool, DieselError> {
        let id = id.to_string();
        let completed_at = format_datetime(&completed_at);
        let total = total_ads_found.map(|n| i32::try_from(n).unwrap_or(i32::MAX));
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            let target = scraping_jobs::table.find(&id);
            let rows = match total {
                Some(total) => diesel::update(target)
                    .set((
                        scraping_jobs::status.eq(status.as_str()),
                        scraping_jobs::completed_at.eq(Some(&completed_at)),
                        scraping_jobs::total_ads_found.eq(total),
                    ))
                    .execute(conn)?,
                None => diesel::update(target)
                    .set((
                        scraping_jobs::status.eq(status.as_str()),
                        scraping_jobs::completed_at.eq(Some(&completed_at)),
                    ))
                    .execute(conn)?,
            };
            Ok(rows > 0)
        })
        .await
    }
}

#[async_trait]
impl JobStore for DieselJobRepository {
    async fn create_job(
        &self,
        platform: Platform,
        search_query: &str,
    ) -> Result<ScrapeJob, DieselError> {
        let job = ScrapeJob::new(platform, search_query.to_string());
        let id = job.id.clone();
        let query = job.search_query.clone();
        let created_at = format_datetime(&job.created_at);
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            diesel::insert_into(scraping_jobs::table)
                .values(&NewJob {
                    id: &id,
                    provider_run_id: None,
                    platform: platform.as_str(),
                    search_query: &query,
                    status: JobStatus::Pending.as_str(),
                    total_ads_found: 0,
                    started_at: None,
                    completed_at: None,
                    created_at: &created_at,
                })
                .execute(conn)?;
            Ok(())
        })
        .await?;

        Ok(job)
    }

    async fn get_job(&self, id: &str) -> Result<Option<ScrapeJob>, DieselError> {
        let id = id.to_string();
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            scraping_jobs::table
                .find(&id)
                .first::<JobRecord>(conn)
                .optional()
        })
        .await
        .map(|opt| opt.map(ScrapeJob::from))
    }

    async fn list_jobs(&self) -> Result<Vec<ScrapeJob>, DieselError> {
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            scraping_jobs::table
                .order(scraping_jobs::created_at.desc())
                .load::<JobRecord>(conn)
        })
        .await
        .map(|records| records.into_iter().map(ScrapeJob::from).collect())
    }

    async fn mark_running(
        &self,
        id: &str,
        provider_run_id: &str,
        started_at: DateTime<Utc>,
    ) -> Result<bool, DieselError> {
        let id = id.to_string();
        let run_id = provider_run_id.to_string();
        let started_at = format_datetime(&started_at);
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            let rows = diesel::update(scraping_jobs::table.find(&id))
                .set((
                    scraping_jobs::status.eq(JobStatus::Running.as_str()),
                    scraping_jobs::provider_run_id.eq(Some(&run_id)),
                    scraping_jobs::started_at.eq(Some(&started_at)),
                ))
                .execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn mark_completed(
        &self,
        id: &str,
        total_ads_found: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, DieselError> {
        self.set_status(id, JobStatus::Completed, completed_at, Some(total_ads_found))
            .await
    }

    async fn mark_failed(
        &self,
        id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, DieselError> {
        self.set_status(id, JobStatus::Failed, completed_at, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::diesel_pool::create_diesel_pool_from_url;
    use crate::repository::run_migrations;
    use tempfile::tempdir;

    async fn setup_test_db() -> (SqlitePool, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_url = format!("sqlite:{}", dir.path().join("test.db").display());
        run_migrations(&db_url).await.unwrap();
        let pool = create_diesel_pool_from_url(&db_url).unwrap();
        (pool, dir)
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselJobRepository::new(pool);

        let job = repo.create_job(Platform::Tiktok, "protein bars").await.unwrap();
        let fetched = repo.get_job(&job.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Pending);
        assert_eq!(fetched.platform, Platform::Tiktok);
        assert_eq!(fetched.search_query, "protein bars");

        let started = Utc::now();
        assert!(repo.mark_running(&job.id, "run-1", started).await.unwrap());
        let running = repo.get_job(&job.id).await.unwrap().unwrap();
        assert_eq!(running.status, JobStatus::Running);
        assert_eq!(running.provider_run_id.as_deref(), Some("run-1"));
        assert!(running.started_at.is_some());

        assert!(repo.mark_completed(&job.id, 12, Utc::now()).await.unwrap());
        let done = repo.get_job(&job.id).await.unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.total_ads_found, 12);
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_mark_failed_and_missing() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselJobRepository::new(pool);

        let job = repo.create_job(Platform::Facebook, "shoes").await.unwrap();
        assert!(repo.mark_failed(&job.id, Utc::now()).await.unwrap());
        assert_eq!(
            repo.get_job(&job.id).await.unwrap().unwrap().status,
            JobStatus::Failed
        );

        assert!(!repo.mark_failed("missing", Utc::now()).await.unwrap());
        assert!(repo.get_job("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_jobs_newest_first() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselJobRepository::new(pool);

        let first = repo.create_job(Platform::Facebook, "a").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create_job(Platform::Facebook, "b").await.unwrap();

        let jobs = repo.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, second.id);
        assert_eq!(jobs[1].id, first.id);
    }
}
