//! Aggregate insights over a set of normalized ads.
//!
//! A pure reduction used by the `insights` command. Rankings are stable: ads
//! or tokens with equal keys keep the order in which they were first seen.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::NormalizedAd;
use crate::normalize::{mean, round_to_tenth};

const TOP_ADS: usize = 5;
const TOP_CTAS: usize = 5;
const TOP_HASHTAGS: usize = 10;

/// Compact view of one ad in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAd {
    pub ad_id: String,
    pub title: String,
    pub advertiser_name: String,
    pub performance_score: u8,
    pub active_hours: u64,
    pub variants: u32,
}

impl From<&NormalizedAd> for RankedAd {
    fn from(ad: &NormalizedAd) -> Self {
        Self {
            ad_id: ad.ad_id.clone(),
            title: ad.title.clone(),
            advertiser_name: ad.advertiser_name.clone(),
            performance_score: ad.performance_score,
            active_hours: ad.active_hours,
            variants: ad.variants,
        }
    }
}

/// A token and the number of ads it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total: usize,
    pub video_count: usize,
    pub image_count: usize,
    pub average_active_hours: u64,
    pub average_variants: f64,
    pub top_performers: Vec<RankedAd>,
    pub longest_running: Vec<RankedAd>,
    pub most_tested: Vec<RankedAd>,
    pub top_ctas: Vec<Count>,
    pub platform_distribution: Vec<Count>,
    pub top_hashtags: Vec<Count>,
}

impl Insights {
    pub fn from_ads(ads: &[NormalizedAd]) -> Self {
        let total = ads.len();
        let video_count = ads.iter().filter(|ad| ad.is_video()).count();
        let hours: f64 = ads.iter().map(|ad| ad.active_hours as f64).sum();
        let variants: f64 = ads.iter().map(|ad| f64::from(ad.variants)).sum();

        Self {
            total,
            video_count,
            image_count: total - video_count,
            average_active_hours: mean(hours, total).round() as u64,
            average_variants: round_to_tenth(mean(variants, total)),
            top_performers: rank_by(ads, |ad| u64::from(ad.performance_score)),
            longest_running: rank_by(ads, |ad| ad.active_hours),
            most_tested: rank_by(ads, |ad| u64::from(ad.variants)),
            top_ctas: tally(ads.iter().map(|ad| ad.cta_text.as_str()), TOP_CTAS),
            platform_distribution: tally(ads.iter().flat_map(|ad| ad.platform_list()), usize::MAX),
            top_hashtags: tally(ads.iter().flat_map(|ad| ad.hashtag_list()), TOP_HASHTAGS),
        }
    }
}

fn rank_by(ads: &[NormalizedAd], key: impl Fn(&NormalizedAd) -> u64) -> Vec<RankedAd> {
    let mut ranked: Vec<&NormalizedAd> = ads.iter().collect();
    ranked.sort_by_key(|ad| std::cmp::Reverse(key(ad)));
    ranked.into_iter().take(TOP_ADS).map(RankedAd::from).collect()
}

fn tally<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<Count> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for value in values.filter(|v| !v.is_empty()) {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut tallied: Vec<Count> = order
        .into_iter()
        .map(|value| Count {
            value: value.to_string(),
            count: counts[value],
        })
        .collect();
    tallied.sort_by_key(|c| std::cmp::Reverse(c.count));
    tallied.truncate(limit);
    tallied
}
