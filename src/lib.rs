//! adscope - ad library normalization, scoring and analysis.
//!
//! Turns raw ad-library items collected by a scrape provider into ranked,
//! normalized ads, stores them in SQLite, and reports insights over them.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod insights;
pub mod migrations;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod schema;
pub mod services;

pub use normalize::{normalize_and_score, NormalizedBatch};
