//! Analyze command.

use console::style;

use crate::analysis::{AnalysisProvider, GeminiAnalysisProvider};
use crate::config::{Config, Settings};
use crate::services::AnalysisService;

use super::super::helpers::open_stores;

pub async fn cmd_analyze(settings: &Settings, config: &Config, ad_id: &str) -> anyhow::Result<()> {
    let provider = GeminiAnalysisProvider::new(config.analysis.clone());
    if !provider.is_available() {
        println!(
            "{} Analysis unavailable: enable it in the config and set GEMINI_API_KEY",
            style("✗").red()
        );
        return Ok(());
    }

    let stores = open_stores(settings).await?;
    let service = AnalysisService::new(&stores.ads, &provider);

    println!("{} Analyzing ad {}...", style("→").cyan(), ad_id);
    let analysis = service.analyze_ad(ad_id).await?;

    println!("{} Analysis saved ({} sections)", style("✓").green(), analysis.sections.len());
    if !analysis.summary.is_empty() {
        println!("\n{}", analysis.summary);
    }
    Ok(())
}
