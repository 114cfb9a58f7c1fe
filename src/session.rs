//! Analysis session: a vacancy table loaded and normalized once, queried many times

use std::time::Instant;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use log::info;

use crate::algorithm::normalize::{NormalizedTable, normalize};
use crate::algorithm::pipeline;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::load_table;
use crate::models::query::RoleQuery;
use crate::models::report::AnalysisReport;
use crate::schema::START_DATE;
use crate::utils::logging::log_warning;

/// A normalized vacancy table plus the configuration used to analyze it
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    config: AnalysisConfig,
    table: NormalizedTable,
}

impl AnalysisSession {
    /// Load and normalize the table at the configured data path
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] when no data path is configured and
    /// propagates load and normalization errors.
    pub fn open(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let path = config.require_data_path()?.to_path_buf();
        let batches = load_table(&path, config.batch_size)?;

        let session = Self::from_batches(config, &batches)?;
        let unparsed = session.unparsed_start_dates();
        if unparsed > 0 {
            log_warning(
                &format!("{unparsed} rows have an unparseable start date and are excluded from every date range"),
                Some(&path),
            );
        }
        Ok(session)
    }

    /// Normalize already loaded raw batches
    pub fn from_batches(config: AnalysisConfig, batches: &[RecordBatch]) -> Result<Self> {
        let start = Instant::now();
        let raw_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        let table = normalize(batches, &config.date_formats)?;
        info!(
            "Normalized {} raw rows into {} unique vacancies in {:?}",
            raw_rows,
            table.num_rows(),
            start.elapsed()
        );
        Ok(Self { config, table })
    }

    #[must_use]
    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Number of rows whose start date could not be parsed
    #[must_use]
    pub fn unparsed_start_dates(&self) -> usize {
        self.table
            .batch()
            .column_by_name(START_DATE)
            .map_or(0, |column| column.null_count())
    }

    /// Run one role query against the session table
    pub fn analyze(&self, query: &RoleQuery) -> Result<AnalysisReport> {
        pipeline::analyze(Some(&self.table), query, &self.config)
    }
}
