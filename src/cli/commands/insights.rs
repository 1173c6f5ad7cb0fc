//! Insights command.

use console::style;

use crate::config::Settings;
use crate::insights::{Count, Insights, RankedAd};
use crate::models::{NormalizedAd, Platform};
use crate::repository::{AdFilter, AdStore};

use super::super::helpers::{open_stores, truncate};

fn print_ranking(heading: &str, ranked: &[RankedAd]) {
    println!("\n{}", style(heading).bold());
    for (i, ad) in ranked.iter().enumerate() {
        println!(
            "  {}. {:<24} score {:>3}  {:>5}h  {:>2} variants  {}",
            i + 1,
            truncate(&ad.advertiser_name, 23),
            ad.performance_score,
            ad.active_hours,
            ad.variants,
            truncate(&ad.title, 30)
        );
    }
}

fn print_counts(heading: &str, counts: &[Count]) {
    println!("\n{}", style(heading).bold());
    for c in counts {
        println!("  {:<30} {}", truncate(&c.value, 29), c.count);
    }
}

pub async fn cmd_insights(settings: &Settings, platform: Option<Platform>, json: bool) -> anyhow::Result<()> {
    let stores = open_stores(settings).await?;
    let filter = AdFilter {
        platform,
        ..AdFilter::default()
    };
    let ads: Vec<NormalizedAd> = stores
        .ads
        .list_ads(&filter)
        .await?
        .into_iter()
        .map(|stored| stored.ad)
        .collect();
    let insights = Insights::from_ads(&ads);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if insights.total == 0 {
        println!("{} No ads stored yet", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Ad Insights").bold());
    println!("{}", "-".repeat(60));
    println!(
        "  Ads: {}  (video {}, image {})",
        insights.total, insights.video_count, insights.image_count
    );
    println!(
        "  Avg active hours: {}  Avg variants: {:.1}",
        insights.average_active_hours, insights.average_variants
    );

    print_ranking("Top performers", &insights.top_performers);
    print_ranking("Longest running", &insights.longest_running);
    print_ranking("Most tested", &insights.most_tested);
    print_counts("Top CTAs", &insights.top_ctas);
    print_counts("Platforms", &insights.platform_distribution);
    print_counts("Top hashtags", &insights.top_hashtags);

    Ok(())
}
