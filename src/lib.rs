//! # neodb - Near-Earth Object Database
//!
//! Links NASA's near-Earth object catalog with its close-approach records
//! and answers filtered queries over the result.
//!
//! neodb provides:
//! - Typed record model for NEOs and close approaches
//! - A one-pass linker that builds designation/name indices and cross-references records
//! - Composable filters and a lazy query stream
//! - CSV/JSON extraction and result writers
//! - Terminal UI helpers for the `neodb` binary

pub mod datetime;
pub mod neo;
pub mod approach;
pub mod database;
pub mod linker;
pub mod query;
pub mod extract;
pub mod write;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use neo::{NearEarthObject, NeoRecord, NeoId};
pub use approach::{CloseApproach, ApproachRecord, ApproachId, ApproachView};
pub use database::NeoDatabase;
pub use linker::{build_database, LinkReport, DanglingApproach};
pub use query::{Filter, FilterCriteria, Query, create_filters, limit};

/// Result type alias for neodb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for neodb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
