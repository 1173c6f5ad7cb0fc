//! Normalized ad models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ad platform a scrape job targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "facebook" => Some(Self::Facebook),
            "tiktok" => Some(Self::Tiktok),
            _ => None,
        }
    }

    /// Public ad-library page for a single ad on this platform.
    pub fn library_url(&self, ad_id: &str) -> String {
        match self {
            Self::Facebook => format!("https://www.facebook.com/ads/library/?id={}", ad_id),
            Self::Tiktok => format!("https://library.tiktok.com/ads/detail/?ad_id={}", ad_id),
        }
    }
}

/// Creative type of an ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Video,
    Image,
}

impl AdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveStatus {
    Active,
    Inactive,
}

impl ActiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verified {
    Yes,
    No,
}

impl Verified {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Verified {
    fn from(verified: bool) -> Self {
        if verified {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Canonical, fixed-schema ad record produced from one raw ad-library item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAd {
    /// Identifier from the ad library, or a synthesized fallback.
    pub ad_id: String,
    /// Inherited from the owning scrape job.
    pub platform: Platform,
    #[serde(rename = "type")]
    pub ad_type: AdType,
    /// Ad-library page for this ad.
    pub url: String,
    /// Video URL for video ads, image URL otherwise.
    pub download_url: Option<String>,
    pub thumbnail: String,
    pub advertiser_name: String,
    pub ad_copy: String,
    pub title: String,
    pub cta_text: String,
    pub landing_url: String,
    pub active_status: ActiveStatus,
    pub active_hours: u64,
    pub variants: u32,
    /// Publisher platforms joined with ", ".
    pub platforms_used: String,
    pub page_likes: u64,
    pub verified: Verified,
    /// Heuristic success score in `[0, 100]`.
    pub performance_score: u8,
    pub est_reach: String,
    pub ad_format: String,
    /// Hashtags from the body text joined with ", ".
    pub hashtags: String,
    /// The raw item exactly as received.
    pub raw_data: serde_json::Value,
    pub scraped_at: DateTime<Utc>,
}

impl NormalizedAd {
    pub fn is_video(&self) -> bool {
        self.ad_type == AdType::Video
    }

    pub fn is_active(&self) -> bool {
        self.active_status == ActiveStatus::Active
    }

    /// Hashtags as individual tokens.
    pub fn hashtag_list(&self) -> impl Iterator<Item = &str> {
        self.hashtags.split(", ").filter(|t| !t.is_empty())
    }

    /// Publisher platforms as individual names.
    pub fn platform_list(&self) -> impl Iterator<Item = &str> {
        self.platforms_used.split(", ").filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_roundtrip() {
        for platform in [Platform::Facebook, Platform::Tiktok] {
            assert_eq!(Platform::from_str(platform.as_str()), Some(platform));
        }
        assert_eq!(Platform::from_str("myspace"), None);
    }

    #[test]
    fn test_library_url() {
        assert_eq!(
            Platform::Facebook.library_url("123"),
            "https://www.facebook.com/ads/library/?id=123"
        );
        assert!(Platform::Tiktok.library_url("9").ends_with("ad_id=9"));
    }

    #[test]
    fn test_verified_from_bool() {
        assert_eq!(Verified::from(true), Verified::Yes);
        assert_eq!(Verified::from(false), Verified::No);
        assert!(Verified::Yes.is_verified());
    }
}
