//! Ad analysis service.
//!
//! Loads a stored ad, hands it to an [`AnalysisProvider`] and persists the
//! result. The provider is chosen by the caller.

use thiserror::Error;
use tracing::info;

use crate::analysis::{AdAnalysis, AnalysisError, AnalysisProvider};
use crate::repository::{AdStore, DieselError};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Ad not found: {0}")]
    AdNotFound(String),
    #[error("Provider {0} is not available")]
    Unavailable(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Service for analyzing stored ads.
pub struct AnalysisService<'a> {
    ads: &'a dyn AdStore,
    provider: &'a dyn AnalysisProvider,
}

impl<'a> AnalysisService<'a> {
    pub fn new(ads: &'a dyn AdStore, provider: &'a dyn AnalysisProvider) -> Self {
        Self { ads, provider }
    }

    /// Analyze one stored ad by row id and save the result.
    pub async fn analyze_ad(&self, id: &str) -> Result<AdAnalysis, AnalyzeError> {
        if !self.provider.is_available() {
            return Err(AnalyzeError::Unavailable(self.provider.name().to_string()));
        }

        let stored = self
            .ads
            .get_ad(id)
            .await?
            .ok_or_else(|| AnalyzeError::AdNotFound(id.to_string()))?;

        let analysis = self.provider.analyze(&stored.ad).await?;
        if !self.ads.save_analysis(id, &analysis).await? {
            return Err(AnalyzeError::AdNotFound(id.to_string()));
        }
        info!("Saved {} analysis for ad {}", self.provider.name(), id);

        Ok(analysis)
    }
}
