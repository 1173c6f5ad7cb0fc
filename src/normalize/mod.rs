//! Ad normalization and scoring.
//!
//! Turns a batch of heterogeneously shaped ad-library items into a ranked
//! sequence of [`NormalizedAd`] records ready for insertion, plus aggregate
//! statistics for status reporting. The transformation is pure: it performs
//! no I/O, holds no shared state, and never fails on missing data. Every
//! absent field has a default.

mod media;
mod raw;
mod score;
mod stats;

pub use media::{resolve_media, Media};
pub use raw::RawAdItem;
pub use score::{performance_score, seconds_to_hours};
pub use stats::{BatchStats, TopPerformer};

pub(crate) use stats::{mean, round_to_tenth};

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{ActiveStatus, NormalizedAd, Platform, Verified};

pub const UNKNOWN_ADVERTISER: &str = "Unknown Advertiser";
pub const DEFAULT_CTA: &str = "Shop now";
pub const DEFAULT_AD_FORMAT: &str = "UNKNOWN";
pub const NO_REACH_DATA: &str = "No data";

/// Page verification value marking a blue-verified advertiser.
pub const BLUE_VERIFIED: &str = "BLUE_VERIFIED";

/// Advertiser name sources, most specific first.
const ADVERTISER_NAME: &[&str] = &[
    "/snapshot/page_name",
    "/page_name",
    "/advertiser/page_name",
    "/advertiser/name",
    "/advertiser/ad_library_page_info/page_info/page_name",
];

const AD_ID: &str = "/ad_archive_id";
const AD_LIBRARY_URL: &str = "/ad_library_url";
const BODY_TEXT: &str = "/snapshot/body/text";
const TITLE: &str = "/snapshot/title";
const CTA_TEXT: &str = "/snapshot/cta_text";
const LINK_URL: &str = "/snapshot/link_url";
const PAGE_LIKES: &str = "/snapshot/page_like_count";
const DISPLAY_FORMAT: &str = "/snapshot/display_format";
const TOTAL_ACTIVE_TIME: &str = "/total_active_time";
const COLLATION_COUNT: &str = "/collation_count";
const PUBLISHER_PLATFORM: &str = "/publisher_platform";
const IS_ACTIVE: &str = "/is_active";
const PAGE_VERIFICATION: &str = "/advertiser/ad_library_page_info/page_info/page_verification";
const EU_TOTAL_REACH: &str = "/aaa_info/eu_total_reach";

/// Result of normalizing one provider batch.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedBatch {
    pub job_id: String,
    /// Sorted by performance score, highest first; ties keep input order.
    pub ads: Vec<NormalizedAd>,
    pub stats: BatchStats,
    /// Entries dropped because they were not JSON objects.
    pub skipped: usize,
}

/// Normalize, score and rank a batch of raw ad-library items.
///
/// `platform` comes from the owning job. `job_id` is carried through to the
/// result for traceability only.
pub fn normalize_and_score(raw_items: &[Value], platform: Platform, job_id: &str) -> NormalizedBatch {
    normalize_and_score_at(raw_items, platform, job_id, Utc::now())
}

/// Same as [`normalize_and_score`] with an explicit normalization timestamp.
pub fn normalize_and_score_at(
    raw_items: &[Value],
    platform: Platform,
    job_id: &str,
    scraped_at: DateTime<Utc>,
) -> NormalizedBatch {
    let mut skipped = 0;
    let mut ads = Vec::with_capacity(raw_items.len());

    for (index, value) in raw_items.iter().enumerate() {
        match RawAdItem::new(value) {
            Some(item) => ads.push(normalize_item(&item, platform, scraped_at)),
            None => {
                warn!(job_id, index, "Skipping malformed ad entry (not an object)");
                skipped += 1;
            }
        }
    }

    // slice::sort_by is stable, so equal scores keep their input order.
    ads.sort_by(|a, b| b.performance_score.cmp(&a.performance_score));

    let stats = BatchStats::from_ads(&ads);
    debug!(
        job_id,
        normalized = ads.len(),
        skipped,
        "Normalized ad batch for {}",
        platform.as_str()
    );

    NormalizedBatch {
        job_id: job_id.to_string(),
        ads,
        stats,
        skipped,
    }
}

/// Normalize a single raw item.
pub fn normalize_item(item: &RawAdItem<'_>, platform: Platform, scraped_at: DateTime<Utc>) -> NormalizedAd {
    let media = resolve_media(item);

    let ad_id = item
        .text(AD_ID)
        .unwrap_or_else(|| synthesize_ad_id(scraped_at));
    let url = item
        .text(AD_LIBRARY_URL)
        .unwrap_or_else(|| platform.library_url(&ad_id));

    let ad_copy = item.text(BODY_TEXT).unwrap_or_default();
    let hashtags = extract_hashtags(&ad_copy);

    let active_hours = item.number(TOTAL_ACTIVE_TIME).map_or(0, seconds_to_hours);
    let variants = item
        .number(COLLATION_COUNT)
        .map(|n| n.round())
        .filter(|n| *n >= 1.0)
        .map_or(1, |n| n.min(f64::from(u32::MAX)) as u32);
    let platforms = item.text_list(PUBLISHER_PLATFORM);
    let platform_count = item
        .array_len(PUBLISHER_PLATFORM)
        .filter(|len| *len > 0)
        .map_or(1, |len| u32::try_from(len).unwrap_or(u32::MAX));
    let verified = item.text(PAGE_VERIFICATION).as_deref() == Some(BLUE_VERIFIED);

    NormalizedAd {
        ad_id,
        platform,
        ad_type: media.ad_type,
        url,
        download_url: media.download_url,
        thumbnail: media.thumbnail,
        advertiser_name: item
            .first_text(ADVERTISER_NAME)
            .unwrap_or_else(|| UNKNOWN_ADVERTISER.to_string()),
        ad_copy,
        title: item.text(TITLE).unwrap_or_default(),
        cta_text: item.text(CTA_TEXT).unwrap_or_else(|| DEFAULT_CTA.to_string()),
        landing_url: item.text(LINK_URL).unwrap_or_default(),
        active_status: if item.flag(IS_ACTIVE) {
            ActiveStatus::Active
        } else {
            ActiveStatus::Inactive
        },
        active_hours,
        variants,
        platforms_used: platforms.join(", "),
        page_likes: item
            .number(PAGE_LIKES)
            .filter(|n| *n > 0.0)
            .map_or(0, |n| n.round() as u64),
        verified: Verified::from(verified),
        performance_score: performance_score(active_hours, variants, platform_count, verified),
        est_reach: format_reach(item),
        ad_format: item
            .text(DISPLAY_FORMAT)
            .unwrap_or_else(|| DEFAULT_AD_FORMAT.to_string()),
        hashtags,
        raw_data: item.value().clone(),
        scraped_at,
    }
}

fn hashtag_re() -> &'static Regex {
    static HASHTAG_RE: OnceLock<Regex> = OnceLock::new();
    // ASCII word characters only, so "#café" yields "#caf".
    HASHTAG_RE.get_or_init(|| Regex::new(r"#[A-Za-z0-9_]+").expect("valid hashtag regex"))
}

/// Extract `#word` tokens from ad copy, joined with ", ".
pub fn extract_hashtags(text: &str) -> String {
    hashtag_re()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_reach(item: &RawAdItem<'_>) -> String {
    match item.get(EU_TOTAL_REACH) {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f != 0.0) => format!("EU: {}k", n),
        Some(Value::String(s)) if !s.is_empty() => format!("EU: {}k", s),
        _ => NO_REACH_DATA.to_string(),
    }
}

/// Fallback identifier for items without an ad-library id.
fn synthesize_ad_id(now: DateTime<Utc>) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &random[..12])
}
