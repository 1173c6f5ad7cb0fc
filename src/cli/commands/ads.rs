//! Stored ad commands.

use console::style;

use crate::config::Settings;
use crate::models::Platform;
use crate::repository::{AdFilter, AdStore};

use super::super::helpers::{open_stores, truncate};

pub async fn cmd_ads_list(
    settings: &Settings,
    analyzed: bool,
    platform: Option<Platform>,
    limit: i64,
) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let filter = AdFilter {
        analyzed_only: analyzed,
        platform,
        limit: (limit > 0).then_some(limit),
    };
    let ads = stores.ads.list_ads(&filter).await?;

    if ads.is_empty() {
        println!("{} No ads found", style("!").yellow());
        return Ok(());
    }

    println!(
        "{:<36} {:>5}  {:<6} {:<8} {:<24} Title",
        "ID", "Score", "Type", "Status", "Advertiser"
    );
    println!("{}", "-".repeat(110));
    for stored in ads {
        let ad = &stored.ad;
        let marker = if stored.is_analyzed() { "*" } else { " " };
        println!(
            "{:<36} {:>5}{} {:<6} {:<8} {:<24} {}",
            stored.id,
            ad.performance_score,
            marker,
            ad.ad_type.as_str(),
            ad.active_status.as_str(),
            truncate(&ad.advertiser_name, 23),
            truncate(&ad.title, 40)
        );
    }

    Ok(())
}

pub async fn cmd_ads_show(settings: &Settings, id: &str, raw: bool) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let Some(stored) = stores.ads.get_ad(id).await? else {
        println!("{} Ad '{}' not found", style("✗").red(), id);
        return Ok(());
    };
    let ad = &stored.ad;

    println!("\n{} {}", style(&ad.advertiser_name).bold(), style(&ad.ad_id).dim());
    println!("  Score:      {}", style(ad.performance_score).bold());
    println!("  Platform:   {} ({})", ad.platform.as_str(), ad.platforms_used);
    println!("  Type:       {} / {}", ad.ad_type.as_str(), ad.ad_format);
    println!("  Status:     {} for {}h", ad.active_status.as_str(), ad.active_hours);
    println!("  Variants:   {}", ad.variants);
    println!("  Verified:   {}", ad.verified.as_str());
    println!("  Page likes: {}", ad.page_likes);
    println!("  Reach:      {}", ad.est_reach);
    println!("  Title:      {}", ad.title);
    println!("  CTA:        {}", ad.cta_text);
    println!("  Landing:    {}", ad.landing_url);
    println!("  Library:    {}", ad.url);
    if let Some(media) = ad.download_url.as_deref().filter(|m| !m.is_empty()) {
        println!("  Media:      {}", media);
    }
    if !ad.hashtags.is_empty() {
        println!("  Hashtags:   {}", ad.hashtags);
    }
    if !ad.ad_copy.is_empty() {
        println!("\n{}", ad.ad_copy);
    }

    if let Some(analysis) = &stored.analysis {
        println!(
            "\n{} ({} / {})",
            style("Analysis").bold(),
            analysis.provider,
            analysis.model
        );
        if !analysis.summary.is_empty() {
            println!("{}", analysis.summary);
        }
        for (name, text) in &analysis.sections {
            println!("\n{}\n{}", style(name).cyan(), text);
        }
    }

    if raw {
        println!("\n{}", serde_json::to_string_pretty(&ad.raw_data)?);
    }

    Ok(())
}
