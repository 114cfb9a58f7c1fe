//! File output for analysis tables.

pub mod csv;

pub use csv::{export_report, write_csv};
