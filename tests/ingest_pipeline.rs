//! End-to-end ingest tests against a migrated temporary database.

use adscope::models::{AdType, JobStatus, Platform};
use adscope::repository::{
    create_diesel_pool_from_url, run_migrations, AdFilter, AdStore, DieselAdRepository,
    DieselJobRepository,
};
use adscope::services::{parse_batch, IngestError, IngestService, ProviderRunStatus, RunOutcome};
use tempfile::TempDir;

const DATASET: &str = include_str!("fixtures/facebook_dataset.json");

async fn setup() -> (DieselJobRepository, DieselAdRepository, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite:{}", dir.path().join("adscope.db").display());
    run_migrations(&db_url).await.unwrap();
    let pool = create_diesel_pool_from_url(&db_url).unwrap();
    (
        DieselJobRepository::new(pool.clone()),
        DieselAdRepository::new(pool),
        dir,
    )
}

#[tokio::test]
async fn ingest_dataset_end_to_end() {
    let (jobs, ads, _dir) = setup().await;
    let service = IngestService::new(&jobs, &ads);

    let job = service.create_job(Platform::Facebook, "running shoes").await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    let job = service.start_job(&job.id, "run-abc").await.unwrap();
    assert_eq!(job.status, JobStatus::Running);

    let items = parse_batch(DATASET).unwrap();
    let report = service.ingest_batch(&job.id, &items).await.unwrap();

    assert_eq!(report.inserted.len(), 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.job.status, JobStatus::Completed);
    assert_eq!(report.job.total_ads_found, 4);
    assert!(report.job.completed_at.is_some());

    let stats = &report.stats;
    assert_eq!(stats.total_ads, 3);
    assert_eq!(stats.active_ads, 2);
    assert_eq!(stats.video_count, 1);
    assert_eq!(stats.image_count, 2);
    // (240 + 2 + 72) / 3
    assert_eq!(stats.average_active_hours, 105);
    // (6 + 1 + 3) / 3
    assert_eq!(stats.average_variants, 3.3);
    let top = stats.top_performer.as_ref().unwrap();
    assert_eq!(top.id, "1001");
    assert_eq!(top.score, 88);

    // Inserted ids come back in ranked order.
    let first = ads.get_ad(&report.inserted[0]).await.unwrap().unwrap();
    assert_eq!(first.ad.ad_id, "1001");
    assert_eq!(first.ad.ad_type, AdType::Video);
    assert_eq!(first.ad.hashtags, "#SALE, #runners");
    assert_eq!(first.ad.advertiser_name, "Acme Shoes");

    let job_ads = service.job_ads(&job.id).await.unwrap();
    assert_eq!(job_ads.len(), 3);
    let scores: Vec<u8> = job_ads.iter().map(|s| s.ad.performance_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let synthesized = job_ads
        .iter()
        .find(|s| s.ad.advertiser_name == "Trail Co")
        .unwrap();
    assert!(synthesized
        .ad
        .url
        .ends_with(&format!("?id={}", synthesized.ad.ad_id)));
}

#[tokio::test]
async fn completed_job_rejects_second_batch() {
    let (jobs, ads, _dir) = setup().await;
    let service = IngestService::new(&jobs, &ads);

    let job = service.create_job(Platform::Facebook, "socks").await.unwrap();
    service.start_job(&job.id, "run-1").await.unwrap();
    service.ingest_batch(&job.id, &[]).await.unwrap();

    let again = service.ingest_batch(&job.id, &parse_batch(DATASET).unwrap()).await;
    assert!(matches!(again, Err(IngestError::AlreadyCompleted(_))));
    assert_eq!(ads.count_ads().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_batch_completes_with_zeroed_stats() {
    let (jobs, ads, _dir) = setup().await;
    let service = IngestService::new(&jobs, &ads);

    let job = service.create_job(Platform::Tiktok, "nothing").await.unwrap();
    service.start_job(&job.id, "run-empty").await.unwrap();
    let report = service.ingest_batch(&job.id, &[]).await.unwrap();

    assert!(report.inserted.is_empty());
    assert_eq!(report.stats.total_ads, 0);
    assert_eq!(report.stats.average_active_hours, 0);
    assert_eq!(report.stats.average_variants, 0.0);
    assert!(report.stats.top_performer.is_none());
    assert_eq!(report.job.status, JobStatus::Completed);
}

#[tokio::test]
async fn provider_run_statuses() {
    let (jobs, ads, _dir) = setup().await;
    let service = IngestService::new(&jobs, &ads);
    let items = parse_batch(DATASET).unwrap();

    let job = service.create_job(Platform::Facebook, "shoes").await.unwrap();
    let outcome = service
        .apply_run_status(&job.id, ProviderRunStatus::parse("SUCCEEDED"), &items)
        .await;
    assert!(matches!(outcome, Err(IngestError::NotStarted(_))));
    assert_eq!(ads.count_ads().await.unwrap(), 0);

    service.start_job(&job.id, "run-1").await.unwrap();
    let outcome = service
        .apply_run_status(&job.id, ProviderRunStatus::parse("RUNNING"), &[])
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Pending { ref status } if status == "running"));

    let outcome = service
        .apply_run_status(&job.id, ProviderRunStatus::parse("SUCCEEDED"), &items)
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Ingested(ref r) if r.inserted.len() == 3));
    assert_eq!(service.job_ads(&job.id).await.unwrap().len(), 3);

    let other = service.create_job(Platform::Facebook, "hats").await.unwrap();
    let outcome = service
        .apply_run_status(&other.id, ProviderRunStatus::parse("TIMED-OUT"), &[])
        .await
        .unwrap();
    match outcome {
        RunOutcome::Failed { job } => assert_eq!(job.status, JobStatus::Failed),
        _ => panic!("expected failed outcome"),
    }

    let missing = service
        .apply_run_status("missing", ProviderRunStatus::Succeeded, &items)
        .await;
    assert!(matches!(missing, Err(IngestError::JobNotFound(_))));

    let listed = ads
        .list_ads(&AdFilter {
            platform: Some(Platform::Facebook),
            ..AdFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
}
