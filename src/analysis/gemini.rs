//! Google Gemini analysis provider.
//!
//! Sends the cleaned ad text to the `generateContent` endpoint and asks for a
//! JSON object of named analysis sections.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    parse_sections, strip_placeholders, truncate, AdAnalysis, AnalysisConfig, AnalysisError,
    AnalysisProvider,
};
use crate::models::NormalizedAd;

const PROMPT: &str = r#"You are an expert performance-marketing analyst. Analyze the ad below using the actual text provided.

ADVERTISER: {advertiser}
PLATFORM: {platform}
FORMAT: {format} ({type})
TITLE: {title}
AD COPY:
{copy}
CALL TO ACTION: {cta}
ACTIVE HOURS: {hours}
VARIANTS TESTED: {variants}
PERFORMANCE SCORE: {score}/100

Return ONLY a JSON object with these string fields:
"summary": two or three sentences on why this ad performs,
"copyAnalysis": hook, benefits, urgency and persuasion in the copy, quoting it,
"titleAnalysis": how the headline earns attention,
"ctaAnalysis": clarity and friction of the call to action,
"targetAudience": who the ad is aimed at and why,
"imageGenerationPrompt": a prompt to recreate a similar creative,
"copyVariations": three alternative headline/body/CTA variations to test."#;

/// Gemini API request format.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String, AnalysisError> {
        if let Some(error) = self.error {
            return Err(AnalysisError::Api(error.message));
        }
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AnalysisError::Parse("No text in Gemini response".to_string()))
    }
}

/// Analysis provider backed by Gemini.
pub struct GeminiAnalysisProvider {
    config: AnalysisConfig,
    api_key: Option<String>,
    client: Client,
}

impl GeminiAnalysisProvider {
    pub fn new(config: AnalysisConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        let api_key = config.resolve_api_key();

        Self {
            config,
            api_key,
            client,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn build_prompt(&self, ad: &NormalizedAd) -> String {
        let or_missing = |s: String| if s.trim().is_empty() { "Not provided".to_string() } else { s };
        let copy = strip_placeholders(&ad.ad_copy, ad);

        PROMPT
            .replace("{advertiser}", &ad.advertiser_name)
            .replace("{platform}", ad.platform.as_str())
            .replace("{format}", &ad.ad_format)
            .replace("{type}", ad.ad_type.as_str())
            .replace("{title}", &or_missing(strip_placeholders(&ad.title, ad)))
            .replace(
                "{copy}",
                &or_missing(truncate(&copy, self.config.max_copy_chars).to_string()),
            )
            .replace("{cta}", &or_missing(strip_placeholders(&ad.cta_text, ad)))
            .replace("{hours}", &ad.active_hours.to_string())
            .replace("{variants}", &ad.variants.to_string())
            .replace("{score}", &ad.performance_score.to_string())
    }

    fn build_request(&self, prompt: String) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json",
            },
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AnalysisError::NotConfigured(
                "GEMINI_API_KEY not set. Get an API key from https://ai.google.dev/".to_string(),
            )
        })?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api(format!("HTTP {}: {}", status, body)));
        }

        let gemini_resp: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::Parse(e.to_string()))?;

        gemini_resp.into_text()
    }
}

#[async_trait]
impl AnalysisProvider for GeminiAnalysisProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        self.config.enabled && self.api_key.is_some()
    }

    async fn analyze(&self, ad: &NormalizedAd) -> Result<AdAnalysis, AnalysisError> {
        if !self.config.enabled {
            return Err(AnalysisError::Disabled);
        }

        debug!("Analyzing ad {} with {}", ad.ad_id, self.config.model);
        let reply = self.generate(self.build_prompt(ad)).await?;
        let mut sections = parse_sections(&reply)?;
        let summary = sections.remove("summary").unwrap_or_default();

        info!("Analyzed ad {} ({} sections)", ad.ad_id, sections.len());
        Ok(AdAnalysis {
            provider: self.name().to_string(),
            model: self.config.model.clone(),
            summary,
            sections,
            analyzed_at: Utc::now(),
        })
    }
}
