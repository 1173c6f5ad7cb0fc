//! Diesel-based ad repository for SQLite.
//!
//! Normalized ads are stored one row per ad with the raw item serialized
//! alongside. Analyses are attached later as a JSON document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::{debug, warn};

use super::diesel_models::{AdRecord, NewAd};
use super::diesel_pool::{run_blocking, DieselError, SqlitePool};
use super::{format_datetime, parse_datetime, parse_datetime_opt, AdFilter, AdStore};
use crate::models::{
    ActiveStatus, AdAnalysis, AdType, NormalizedAd, Platform, StoredAd, Verified,
};
use crate::schema::scraped_ads;

impl NewAd {
    fn from_ad(ad: &NormalizedAd, created_at: &str) -> Self {
        NewAd {
            id: uuid::Uuid::new_v4().to_string(),
            ad_id: ad.ad_id.clone(),
            platform: ad.platform.as_str().to_string(),
            ad_type: ad.ad_type.as_str().to_string(),
            url: ad.url.clone(),
            download_url: ad.download_url.clone(),
            thumbnail: ad.thumbnail.clone(),
            advertiser_name: ad.advertiser_name.clone(),
            ad_copy: ad.ad_copy.clone(),
            title: ad.title.clone(),
            cta_text: ad.cta_text.clone(),
            landing_url: ad.landing_url.clone(),
            active_status: ad.active_status.as_str().to_string(),
            active_hours: i64::try_from(ad.active_hours).unwrap_or(i64::MAX),
            variants: i32::try_from(ad.variants).unwrap_or(i32::MAX),
            platforms_used: ad.platforms_used.clone(),
            page_likes: i64::try_from(ad.page_likes).unwrap_or(i64::MAX),
            verified: ad.verified.as_str().to_string(),
            performance_score: i32::from(ad.performance_score),
            est_reach: ad.est_reach.clone(),
            ad_format: ad.ad_format.clone(),
            hashtags: ad.hashtags.clone(),
            raw_data: ad.raw_data.to_string(),
            scraped_at: format_datetime(&ad.scraped_at),
            created_at: created_at.to_string(),
            analyzed: 0,
        }
    }
}

/// Convert a database record to a domain model.
impl From<AdRecord> for StoredAd {
    fn from(record: AdRecord) -> Self {
        let analysis = record.analysis.as_deref().and_then(|json| {
            serde_json::from_str::<AdAnalysis>(json)
                .map_err(|e| warn!("Ad {} has unreadable analysis: {}", record.id, e))
                .ok()
        });

        let ad = NormalizedAd {
            ad_id: record.ad_id,
            platform: Platform::from_str(&record.platform).unwrap_or(Platform::Facebook),
            ad_type: AdType::from_str(&record.ad_type).unwrap_or(AdType::Image),
            url: record.url,
            download_url: record.download_url,
            thumbnail: record.thumbnail,
            advertiser_name: record.advertiser_name,
            ad_copy: record.ad_copy,
            title: record.title,
            cta_text: record.cta_text,
            landing_url: record.landing_url,
            active_status: ActiveStatus::from_str(&record.active_status)
                .unwrap_or(ActiveStatus::Inactive),
            active_hours: u64::try_from(record.active_hours).unwrap_or(0),
            variants: u32::try_from(record.variants).unwrap_or(1),
            platforms_used: record.platforms_used,
            page_likes: u64::try_from(record.page_likes).unwrap_or(0),
            verified: Verified::from_str(&record.verified).unwrap_or(Verified::No),
            performance_score: u8::try_from(record.performance_score.clamp(0, 100)).unwrap_or(0),
            est_reach: record.est_reach,
            ad_format: record.ad_format,
            hashtags: record.hashtags,
            raw_data: serde_json::from_str(&record.raw_data).unwrap_or_default(),
            scraped_at: parse_datetime(&record.scraped_at),
        };

        StoredAd {
            id: record.id,
            ad,
            analysis,
            analyzed_at: parse_datetime_opt(record.analyzed_at),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Diesel-based ad repository with compile-time query checking.
#[derive(Clone)]
pub struct DieselAdRepository {
    pool: SqlitePool,
}

impl DieselAdRepository {
    /// Create a new Diesel ad repository with an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdStore for DieselAdRepository {
    async fn insert_ads(&self, ads: &[NormalizedAd]) -> Result<Vec<String>, DieselError> {
        if ads.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = format_datetime(&Utc::now());
        let records: Vec<NewAd> = ads
            .iter()
            .map(|ad| NewAd::from_ad(ad, &created_at))
            .collect();
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            conn.transaction(|conn| {
                for record in &records {
                    diesel::insert_into(scraped_ads::table)
                        .values(record)
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await?;

        debug!("Inserted {} ads", ids.len());
        Ok(ids)
    }

    async fn get_ad(&self, id: &str) -> Result<Option<StoredAd>, DieselError> {
        let id = id.to_string();
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            scraped_ads::table
                .find(&id)
                .first::<AdRecord>(conn)
                .optional()
        })
        .await
        .map(|opt| opt.map(StoredAd::from))
    }

    async fn list_ads(&self, filter: &AdFilter) -> Result<Vec<StoredAd>, DieselError> {
        let filter = filter.clone();
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            let mut query = scraped_ads::table.into_boxed();
            if filter.analyzed_only {
                query = query.filter(scraped_ads::analyzed.eq(1));
            }
            if let Some(platform) = filter.platform {
                query = query.filter(scraped_ads::platform.eq(platform.as_str()));
            }
            if let Some(limit) = filter.limit {
                query = query.limit(limit);
            }
            query
                .order(scraped_ads::scraped_at.desc())
                .load::<AdRecord>(conn)
        })
        .await
        .map(|records| records.into_iter().map(StoredAd::from).collect())
    }

    async fn list_ads_since(&self, since: DateTime<Utc>) -> Result<Vec<StoredAd>, DieselError> {
        let since = format_datetime(&since);
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            scraped_ads::table
                .filter(scraped_ads::scraped_at.ge(&since))
                .order(scraped_ads::performance_score.desc())
                .load::<AdRecord>(conn)
        })
        .await
        .map(|records| records.into_iter().map(StoredAd::from).collect())
    }

    async fn save_analysis(&self, id: &str, analysis: &AdAnalysis) -> Result<bool, DieselError> {
        let id = id.to_string();
        let json = serde_json::to_string(analysis)
            .map_err(|e| DieselError::SerializationError(Box::new(e)))?;
        let analyzed_at = format_datetime(&analysis.analyzed_at);
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            let rows = diesel::update(scraped_ads::table.find(&id))
                .set((
                    scraped_ads::analysis.eq(Some(&json)),
                    scraped_ads::analyzed_at.eq(Some(&analyzed_at)),
                    scraped_ads::analyzed.eq(1),
                ))
                .execute(conn)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn count_ads(&self) -> Result<u64, DieselError> {
        let pool = self.pool.clone();

        run_blocking(pool, move |conn| {
            use diesel::dsl::count_star;
            let count: i64 = scraped_ads::table.select(count_star()).first(conn)?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}
