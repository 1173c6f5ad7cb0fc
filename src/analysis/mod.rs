//! Creative analysis of stored ads.
//!
//! Analysis is a pluggable capability: the ingest pipeline never depends on
//! it, and any [`AnalysisProvider`] can be swapped in by the caller.

mod gemini;

pub use gemini::GeminiAnalysisProvider;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::NormalizedAd;
use crate::normalize::UNKNOWN_ADVERTISER;

/// Configuration for the analysis provider.
#[derive(Debug, Clone, Serialize, Deserialize, prefer::FromValue)]
pub struct AnalysisConfig {
    /// Whether analysis is enabled
    #[serde(default = "default_enabled")]
    #[prefer(default = "true")]
    pub enabled: bool,
    /// Generative Language API base URL
    #[serde(default = "default_endpoint")]
    #[prefer(default = "https://generativelanguage.googleapis.com/v1beta")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    #[prefer(default = "gemini-2.0-flash")]
    pub model: String,
    /// API key; falls back to GEMINI_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    #[prefer(default = "0.7")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    #[prefer(default = "8192")]
    pub max_output_tokens: u32,
    /// Maximum characters of ad copy sent to the model
    #[serde(default = "default_max_copy_chars")]
    #[prefer(default = "4000")]
    pub max_copy_chars: usize,
}

fn default_enabled() -> bool {
    true
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    8192
}
fn default_max_copy_chars() -> usize {
    4000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_copy_chars: default_max_copy_chars(),
        }
    }
}

impl AnalysisConfig {
    /// Configured key, else the `GEMINI_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Result of analyzing one ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAnalysis {
    pub provider: String,
    pub model: String,
    pub summary: String,
    /// Named sections of the analysis, e.g. `copyAnalysis`.
    pub sections: BTreeMap<String, String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    #[error("Analysis is disabled")]
    Disabled,
}

/// A service that produces an [`AdAnalysis`] for a normalized ad.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the provider can be called (enabled and credentialed).
    fn is_available(&self) -> bool;

    async fn analyze(&self, ad: &NormalizedAd) -> Result<AdAnalysis, AnalysisError>;
}

fn leftover_placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{[^}]+\}\}").expect("valid placeholder regex"))
}

/// Substitute catalog-ad template tokens with concrete values.
///
/// `{{product.name}}` takes the first card's title, then the ad title.
/// `{{product.brand}}` takes the first card's body, then the advertiser name
/// unless it is the unknown fallback. Unresolved tokens are removed.
pub fn strip_placeholders(text: &str, ad: &NormalizedAd) -> String {
    if text.is_empty() {
        return String::new();
    }

    let card_text = |field: &str| {
        ad.raw_data
            .pointer(&format!("/snapshot/cards/0/{}", field))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    };

    let mut result = text.to_string();
    if let Some(title) = card_text("title") {
        result = result.replace("{{product.name}}", title);
    }
    if let Some(body) = card_text("body") {
        result = result.replace("{{product.brand}}", body);
    }
    if !ad.advertiser_name.is_empty() && ad.advertiser_name != UNKNOWN_ADVERTISER {
        result = result.replace("{{product.brand}}", &ad.advertiser_name);
    }
    if !ad.title.is_empty() {
        result = result.replace("{{product.name}}", &ad.title);
    }

    leftover_placeholder_re().replace_all(&result, "").into_owned()
}

/// Extract named sections from a model reply.
///
/// The reply should be a JSON object, possibly wrapped in a fenced code block
/// or surrounded by prose. String values are kept as-is and other values are
/// serialized back to JSON text.
pub fn parse_sections(reply: &str) -> Result<BTreeMap<String, String>, AnalysisError> {
    let mut text = reply.trim();

    if let Some(start) = text.find("```") {
        let fenced = &text[start + 3..];
        let fenced = fenced.strip_prefix("json").unwrap_or(fenced);
        if let Some(end) = fenced.find("```") {
            text = fenced[..end].trim();
        }
    }

    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if last > first {
            text = &text[first..=last];
        }
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::Parse(e.to_string()))?;
    let serde_json::Value::Object(map) = value else {
        return Err(AnalysisError::Parse("reply is not a JSON object".to_string()));
    };

    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

/// Truncate text to at most `max_chars` characters.
pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::test_support::ad;
    use serde_json::json;

    #[test]
    fn test_placeholders_from_card() {
        let mut a = ad("1", 50);
        a.title = "Ad title".into();
        a.advertiser_name = "Acme".into();
        a.raw_data = json!({"snapshot": {"cards": [{"title": "Runner X", "body": "AcmeCo"}]}});

        assert_eq!(
            strip_placeholders("Buy {{product.name}} from {{product.brand}}", &a),
            "Buy Runner X from AcmeCo"
        );
    }

    #[test]
    fn test_placeholders_fall_back_to_ad_fields() {
        let mut a = ad("1", 50);
        a.title = "Ad title".into();
        a.advertiser_name = "Acme".into();

        assert_eq!(
            strip_placeholders("{{product.name}} by {{product.brand}}", &a),
            "Ad title by Acme"
        );
    }

    #[test]
    fn test_unknown_advertiser_not_substituted() {
        let mut a = ad("1", 50);
        a.title = String::new();
        assert_eq!(
            strip_placeholders("{{product.name}} by {{product.brand}}{{ad.price}}!", &a),
            " by !"
        );
    }

    #[test]
    fn test_parse_sections_bare_json() {
        let sections = parse_sections(r#"{"summary": "Strong hook", "frames": [1, 2]}"#).unwrap();
        assert_eq!(sections["summary"], "Strong hook");
        assert_eq!(sections["frames"], "[1,2]");
    }

    #[test]
    fn test_parse_sections_fenced() {
        let reply = "Here you go:\n```json\n{\"copyAnalysis\": \"Urgent\"}\n```\nThanks";
        let sections = parse_sections(reply).unwrap();
        assert_eq!(sections["copyAnalysis"], "Urgent");
    }

    #[test]
    fn test_parse_sections_rejects_non_object() {
        assert!(matches!(parse_sections("[1, 2]"), Err(AnalysisError::Parse(_))));
        assert!(matches!(parse_sections("no json here"), Err(AnalysisError::Parse(_))));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("日本語テキスト", 3), "日本語");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!(config.enabled);
        assert!(config.model.starts_with("gemini"));
        assert!(config.api_key.is_none());
    }
}
