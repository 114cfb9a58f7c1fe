//! The vacancy analysis pipeline
//!
//! Normalization turns raw batches into a canonical table; the
//! filter-aggregator turns that table plus a role query into the report
//! views.

pub mod aggregate;
pub mod normalize;
pub mod pipeline;

pub use normalize::{NormalizedTable, normalize};
pub use pipeline::{FilterAggregator, analyze};
