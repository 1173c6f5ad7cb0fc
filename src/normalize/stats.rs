//! Aggregate statistics over a normalized batch.

use serde::{Deserialize, Serialize};

use crate::models::NormalizedAd;

/// Summary of the highest-scoring ad in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    pub id: String,
    pub title: String,
    pub score: u8,
    pub active_hours: u64,
    pub variants: u32,
}

/// Batch-level counts and averages reported back to the job's caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub total_ads: usize,
    pub active_ads: usize,
    /// Mean active hours, rounded to a whole hour.
    pub average_active_hours: u64,
    pub video_count: usize,
    pub image_count: usize,
    /// Mean variant count, rounded to one decimal place.
    pub average_variants: f64,
    pub top_performer: Option<TopPerformer>,
}

impl BatchStats {
    /// Reduce a sequence of normalized ads. Averages over an empty input are 0.
    pub fn from_ads(ads: &[NormalizedAd]) -> Self {
        let total_ads = ads.len();
        let active_ads = ads.iter().filter(|ad| ad.is_active()).count();
        let video_count = ads.iter().filter(|ad| ad.is_video()).count();

        let hours: f64 = ads.iter().map(|ad| ad.active_hours as f64).sum();
        let variants: f64 = ads.iter().map(|ad| f64::from(ad.variants)).sum();

        Self {
            total_ads,
            active_ads,
            average_active_hours: mean(hours, total_ads).round() as u64,
            video_count,
            image_count: total_ads - video_count,
            average_variants: round_to_tenth(mean(variants, total_ads)),
            top_performer: top_performer(ads),
        }
    }
}

pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Highest score wins; on ties the earliest ad is kept.
fn top_performer(ads: &[NormalizedAd]) -> Option<TopPerformer> {
    let best = ads.iter().fold(None::<&NormalizedAd>, |best, ad| match best {
        Some(b) if b.performance_score >= ad.performance_score => Some(b),
        _ => Some(ad),
    })?;

    Some(TopPerformer {
        id: best.ad_id.clone(),
        title: best.title.clone(),
        score: best.performance_score,
        active_hours: best.active_hours,
        variants: best.variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::test_support::ad;

    #[test]
    fn test_empty_batch_is_zeroed() {
        let stats = BatchStats::from_ads(&[]);
        assert_eq!(stats.total_ads, 0);
        assert_eq!(stats.average_active_hours, 0);
        assert_eq!(stats.average_variants, 0.0);
        assert!(stats.top_performer.is_none());
        assert!(!stats.average_variants.is_nan());
    }

    #[test]
    fn test_counts_and_averages() {
        let mut a = ad("a", 70);
        a.active_hours = 10;
        a.variants = 1;
        let mut b = ad("b", 50);
        b.active_hours = 11;
        b.variants = 2;
        b.active_status = crate::models::ActiveStatus::Inactive;
        b.ad_type = crate::models::AdType::Video;
        let mut c = ad("c", 90);
        c.active_hours = 0;
        c.variants = 2;

        let stats = BatchStats::from_ads(&[a, b, c]);
        assert_eq!(stats.total_ads, 3);
        assert_eq!(stats.active_ads, 2);
        assert_eq!(stats.video_count, 1);
        assert_eq!(stats.image_count, 2);
        assert_eq!(stats.average_active_hours, 7); // 21 / 3
        assert_eq!(stats.average_variants, 1.7); // 5 / 3 = 1.666..

        let top = stats.top_performer.unwrap();
        assert_eq!(top.id, "c");
        assert_eq!(top.score, 90);
    }

    #[test]
    fn test_top_performer_tie_keeps_first() {
        let stats = BatchStats::from_ads(&[ad("first", 60), ad("second", 60)]);
        assert_eq!(stats.top_performer.unwrap().id, "first");
    }
}
