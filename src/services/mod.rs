//! Service layer for adscope business logic.
//!
//! Services take their stores and providers as explicit parameters and can
//! be driven by the CLI or any other interface.

pub mod analysis;
pub mod ingest;

pub use analysis::{AnalysisService, AnalyzeError};
pub use ingest::{
    library_search_url, parse_batch, IngestError, IngestReport, IngestService, ProviderRunStatus,
    RunOutcome,
};
