//! Emerging job role analysis over national vacancy postings.
//!
//! A vacancy table (CSV or Parquet) is normalized once into an Arrow record
//! batch, then filtered per role by posting date and description keywords
//! and aggregated into a monthly pivot, a trend and ranked occupation,
//! location and industry views.

pub mod algorithm;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod schema;
pub mod session;
pub mod utils;

// Core types
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use session::AnalysisSession;

// Pipeline
pub use algorithm::{FilterAggregator, NormalizedTable, analyze, normalize};
pub use catalog::{RoleCatalog, RoleProfile};
pub use filter::{EmptyKeywordPolicy, KeywordSet, MatchMode};
pub use models::{AnalysisReport, DataState, RoleQuery, default_date_range};

// Arrow types
pub use arrow::record_batch::RecordBatch;
