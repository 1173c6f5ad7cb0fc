use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema")
        .operation(RunSql::portable().for_backend(
            "sqlite",
            r#"CREATE TABLE scraped_ads (
    id TEXT PRIMARY KEY NOT NULL,
    ad_id TEXT NOT NULL,
    platform TEXT NOT NULL,
    ad_type TEXT NOT NULL,
    url TEXT NOT NULL,
    download_url TEXT,
    thumbnail TEXT NOT NULL DEFAULT '',
    advertiser_name TEXT NOT NULL,
    ad_copy TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    cta_text TEXT NOT NULL,
    landing_url TEXT NOT NULL DEFAULT '',
    active_status TEXT NOT NULL,
    active_hours INTEGER NOT NULL DEFAULT 0,
    variants INTEGER NOT NULL DEFAULT 1,
    platforms_used TEXT NOT NULL DEFAULT '',
    page_likes INTEGER NOT NULL DEFAULT 0,
    verified TEXT NOT NULL,
    performance_score INTEGER NOT NULL DEFAULT 0,
    est_reach TEXT NOT NULL,
    ad_format TEXT NOT NULL,
    hashtags TEXT NOT NULL DEFAULT '',
    raw_data TEXT NOT NULL DEFAULT '{}',
    scraped_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    analysis TEXT,
    analyzed_at TEXT,
    analyzed INTEGER NOT NULL DEFAULT 0
)"#,
        ))
        .operation(RunSql::portable().for_backend(
            "sqlite",
            r#"CREATE TABLE scraping_jobs (
    id TEXT PRIMARY KEY NOT NULL,
    provider_run_id TEXT,
    platform TEXT NOT NULL,
    search_query TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    total_ads_found INTEGER NOT NULL DEFAULT 0,
    started_at TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL
)"#,
        ))
        .operation(AddIndex::new(
            "scraped_ads",
            Index::new("idx_scraped_ads_scraped_at").column("scraped_at"),
        ))
        .operation(AddIndex::new(
            "scraped_ads",
            Index::new("idx_scraped_ads_score").column("performance_score"),
        ))
        .operation(AddIndex::new(
            "scraped_ads",
            Index::new("idx_scraped_ads_analyzed").column("analyzed"),
        ))
        .operation(AddIndex::new(
            "scraping_jobs",
            Index::new("idx_scraping_jobs_status").column("status"),
        ))
}
