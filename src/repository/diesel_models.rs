//! Diesel ORM models for database tables.
//!
//! Records mirror the SQLite columns one to one. Conversion into domain
//! models lives next to the repository that loads them.

use diesel::prelude::*;

use crate::schema;

/// Scraped ad record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::scraped_ads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdRecord {
    pub id: String,
    pub ad_id: String,
    pub platform: String,
    pub ad_type: String,
    pub url: String,
    pub download_url: Option<String>,
    pub thumbnail: String,
    pub advertiser_name: String,
    pub ad_copy: String,
    pub title: String,
    pub cta_text: String,
    pub landing_url: String,
    pub active_status: String,
    pub active_hours: i64,
    pub variants: i32,
    pub platforms_used: String,
    pub page_likes: i64,
    pub verified: String,
    pub performance_score: i32,
    pub est_reach: String,
    pub ad_format: String,
    pub hashtags: String,
    pub raw_data: String,
    pub scraped_at: String,
    pub created_at: String,
    pub analysis: Option<String>,
    pub analyzed_at: Option<String>,
    pub analyzed: i32,
}

/// New scraped ad for insertion.
///
/// Owned rather than borrowed so a batch can be moved into a blocking task.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::scraped_ads)]
pub struct NewAd {
    pub id: String,
    pub ad_id: String,
    pub platform: String,
    pub ad_type: String,
    pub url: String,
    pub download_url: Option<String>,
    pub thumbnail: String,
    pub advertiser_name: String,
    pub ad_copy: String,
    pub title: String,
    pub cta_text: String,
    pub landing_url: String,
    pub active_status: String,
    pub active_hours: i64,
    pub variants: i32,
    pub platforms_used: String,
    pub page_likes: i64,
    pub verified: String,
    pub performance_score: i32,
    pub est_reach: String,
    pub ad_format: String,
    pub hashtags: String,
    pub raw_data: String,
    pub scraped_at: String,
    pub created_at: String,
    pub analyzed: i32,
}

/// Scraping job record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::scraping_jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JobRecord {
    pub id: String,
    pub provider_run_id: Option<String>,
    pub platform: String,
    pub search_query: String,
    pub status: String,
    pub total_ads_found: i32,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
}

/// New scraping job for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::scraping_jobs)]
pub struct NewJob<'a> {
    pub id: &'a str,
    pub provider_run_id: Option<&'a str>,
    pub platform: &'a str,
    pub search_query: &'a str,
    pub status: &'a str,
    pub total_ads_found: i32,
    pub started_at: Option<&'a str>,
    pub completed_at: Option<&'a str>,
    pub created_at: &'a str,
}
