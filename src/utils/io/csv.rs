//! Spreadsheet export as CSV
//!
//! Each table becomes one file with a header row; columns keep the order
//! of the record batch schema.

use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::error::util::safe_create_file;
use crate::models::report::AnalysisReport;
use crate::utils::logging::{log_operation_complete, log_warning};

/// File name of the base pivot export
pub const BASE_PIVOT_FILE: &str = "emerging_job_analysis.csv";
/// File name of the trend export
pub const TREND_FILE: &str = "vacancy_trend.csv";
/// File name of the occupations export
pub const OCCUPATIONS_FILE: &str = "top_occupations.csv";
/// File name of the locations export
pub const LOCATIONS_FILE: &str = "top_locations.csv";
/// File name of the industries export
pub const INDUSTRIES_FILE: &str = "top_industries.csv";

/// Write record batches to a single CSV file with one header row
pub fn write_csv(path: &Path, batches: &[RecordBatch]) -> Result<()> {
    let start = Instant::now();
    let file = safe_create_file(path, "writing CSV export")?;

    let mut writer = WriterBuilder::new().with_header(true).build(file);
    for batch in batches {
        writer.write(batch)?;
    }

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("wrote", path, rows, Some(start.elapsed()));
    Ok(())
}

/// Write the base pivot and every view of a report into `dir`
///
/// Returns the paths written, base pivot first.
pub fn export_report(dir: &Path, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
    if !report.has_data() {
        log_warning("Exporting a report without matching vacancies", Some(dir));
    }

    let tables = [
        (BASE_PIVOT_FILE, report.base_pivot_batch()?),
        (TREND_FILE, report.trend_batch()?),
        (OCCUPATIONS_FILE, report.occupations_batch()?),
        (LOCATIONS_FILE, report.locations_batch()?),
        (INDUSTRIES_FILE, report.industries_batch()?),
    ];

    let mut written = Vec::with_capacity(tables.len());
    for (name, batch) in tables {
        let path = dir.join(name);
        write_csv(&path, std::slice::from_ref(&batch))?;
        written.push(path);
    }

    Ok(written)
}
