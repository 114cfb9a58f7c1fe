//! Filtering capabilities for vacancy tables
//!
//! Filters compute boolean keep-masks over Arrow record batches and are
//! combined with [`AndFilter`].

pub mod core;
pub mod date;
pub mod keyword;

pub use self::core::{
    AndFilter, BatchFilter, ExcludeAllFilter, IncludeAllFilter, filter_record_batch,
};
pub use date::DateRangeFilter;
pub use keyword::{EmptyKeywordPolicy, KeywordFilter, KeywordSet, MatchMode};
