//! Text-to-date adaptation for loosely typed input columns.

pub mod date_utils;
pub mod types;

pub use date_utils::{detect_date_format, parse_date_string};
pub use types::DateFormatConfig;
