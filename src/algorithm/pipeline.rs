//! The filter-aggregate pipeline
//!
//! Applies a [`RoleQuery`] to a [`NormalizedTable`]: date range first, then
//! keyword matching on the description, then row tagging, then the pivot
//! views.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use log::{debug, info, warn};

use crate::algorithm::aggregate;
use crate::algorithm::normalize::NormalizedTable;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::filter::{
    AndFilter, BatchFilter, DateRangeFilter, EmptyKeywordPolicy, KeywordFilter,
};
use crate::models::record::TaggedRecord;
use crate::models::report::{AnalysisReport, DataState};
use crate::models::query::RoleQuery;
use crate::schema::{JOB_DESCRIPTION, START_DATE, tagged_schema};

/// Filters a normalized table for one role and aggregates the result
#[derive(Debug, Clone)]
pub struct FilterAggregator {
    top_n: usize,
    empty_keywords: EmptyKeywordPolicy,
}

impl Default for FilterAggregator {
    fn default() -> Self {
        Self {
            top_n: aggregate::DEFAULT_TOP_N,
            empty_keywords: EmptyKeywordPolicy::default(),
        }
    }
}

impl FilterAggregator {
    #[must_use]
    pub fn new(top_n: usize, empty_keywords: EmptyKeywordPolicy) -> Self {
        Self {
            top_n,
            empty_keywords,
        }
    }

    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.top_n, config.empty_keywords)
    }

    /// Rows of `table` that fall in the query's date range and mention a keyword
    ///
    /// The result carries the `keyword` and `job_role` tag columns.
    pub fn filter(&self, table: &NormalizedTable, query: &RoleQuery) -> Result<RecordBatch> {
        if query.keywords().is_empty() {
            warn!(
                "No keywords given for role '{}'; applying {:?}",
                query.role(),
                self.empty_keywords
            );
        }

        let filters: Vec<Arc<dyn BatchFilter + Send + Sync>> = vec![
            Arc::new(DateRangeFilter::new(
                START_DATE,
                Some(query.start_date()),
                Some(query.end_date()),
            )),
            Arc::new(KeywordFilter::new(
                JOB_DESCRIPTION,
                query.keywords().clone(),
                self.empty_keywords,
            )),
        ];

        let filtered = AndFilter::new(filters).filter(table.batch())?;
        tag_rows(&filtered, query)
    }

    /// Aggregate an already filtered, tagged table
    pub fn aggregate(&self, filtered: RecordBatch, query: &RoleQuery) -> Result<AnalysisReport> {
        let rows = TaggedRecord::from_batch(&filtered)?;

        let base_pivot = aggregate::base_pivot(&rows);
        let trend = aggregate::trend(&base_pivot);
        let top_occupations = aggregate::top_occupations(&base_pivot, self.top_n);
        let top_locations = aggregate::top_locations(&base_pivot, self.top_n);
        let top_industries = aggregate::top_industries(&base_pivot, self.top_n);
        let total_open_positions = aggregate::total_open_positions(&base_pivot);

        let data_state = if rows.is_empty() {
            DataState::NoMatches
        } else {
            DataState::Available
        };

        Ok(AnalysisReport {
            role: query.role().to_string(),
            description: query.description().map(str::to_string),
            keywords: query.keywords().label(),
            start_date: query.start_date(),
            end_date: query.end_date(),
            data_state,
            filtered,
            base_pivot,
            trend,
            top_occupations,
            top_locations,
            top_industries,
            total_open_positions,
        })
    }

    /// Run the whole pipeline
    ///
    /// # Errors
    /// Returns [`Error::InputMissing`] when no table is given. An empty table
    /// is not an error; it yields a report in the [`DataState::NoData`] state.
    pub fn run(&self, table: Option<&NormalizedTable>, query: &RoleQuery) -> Result<AnalysisReport> {
        let table = table.ok_or(Error::InputMissing)?;

        if table.is_empty() {
            info!("Vacancy table is empty; nothing to analyze for '{}'", query.role());
            return Ok(AnalysisReport::no_data(query));
        }

        let start = Instant::now();
        let filtered = self.filter(table, query)?;
        debug!(
            "Kept {} of {} rows for role '{}' ({} to {})",
            filtered.num_rows(),
            table.num_rows(),
            query.role(),
            query.start_date(),
            query.end_date()
        );

        let report = self.aggregate(filtered, query)?;
        info!(
            "Analyzed role '{}': {} open positions across {} pivot rows in {:?}",
            report.role,
            report.total_open_positions,
            report.base_pivot.len(),
            start.elapsed()
        );

        Ok(report)
    }
}

/// Run the pipeline with settings taken from `config`
///
/// # Errors
/// See [`FilterAggregator::run`].
pub fn analyze(
    table: Option<&NormalizedTable>,
    query: &RoleQuery,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    FilterAggregator::from_config(config).run(table, query)
}

/// Append the constant `keyword` and `job_role` columns
fn tag_rows(batch: &RecordBatch, query: &RoleQuery) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let label = query.keywords().label();

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(StringArray::from(vec![label.as_str(); rows])));
    columns.push(Arc::new(StringArray::from(vec![query.role(); rows])));

    Ok(RecordBatch::try_new(tagged_schema(), columns)?)
}
