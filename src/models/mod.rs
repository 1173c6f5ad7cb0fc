//! Domain models.

mod ad;
mod job;

pub use ad::{ActiveStatus, AdType, NormalizedAd, Platform, Verified};
pub use job::{JobStatus, ScrapeJob};

// Analysis results live with the providers but are stored alongside ads.
pub use crate::analysis::AdAnalysis;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized ad as persisted in the ad store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAd {
    /// Row identifier (distinct from the ad-library `ad_id`).
    pub id: String,
    #[serde(flatten)]
    pub ad: NormalizedAd,
    pub analysis: Option<AdAnalysis>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl StoredAd {
    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }
}
