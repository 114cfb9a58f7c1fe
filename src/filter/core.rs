//! Core filtering functionality for vacancy tables
//!
//! This module defines the batch filter trait and the mask-based filtering
//! primitive every concrete filter is built on.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::Result;

/// Filter a record batch based on a boolean mask
///
/// Null mask slots drop the row, same as `false`.
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Errors
/// Returns an error if the mask length does not match the batch or
/// filtering fails
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(ArrowError::InvalidArgumentError(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ))
        .into());
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<std::result::Result<_, _>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Compute the keep-mask for a record batch
    ///
    /// # Errors
    /// Returns an error if a required column is missing or has the wrong type
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray>;

    /// Filter a record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.mask(batch)?;
        filter_record_batch(batch, &mask)
    }

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> FxHashSet<String>;
}

/// A filter that always includes all rows
#[derive(Debug, Clone, Default)]
pub struct IncludeAllFilter;

impl BatchFilter for IncludeAllFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        Ok(BooleanArray::from(vec![true; batch.num_rows()]))
    }

    fn required_columns(&self) -> FxHashSet<String> {
        FxHashSet::default()
    }
}

/// A filter that excludes all rows
#[derive(Debug, Clone, Default)]
pub struct ExcludeAllFilter;

impl BatchFilter for ExcludeAllFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        Ok(BooleanArray::from(vec![false; batch.num_rows()]))
    }

    fn required_columns(&self) -> FxHashSet<String> {
        FxHashSet::default()
    }
}

/// A filter that combines multiple filters with a logical AND
#[derive(Debug, Clone)]
pub struct AndFilter {
    filters: Vec<Arc<dyn BatchFilter + Send + Sync>>,
}

impl AndFilter {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn BatchFilter + Send + Sync>>) -> Self {
        Self { filters }
    }
}

impl BatchFilter for AndFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let mut result = IncludeAllFilter.mask(batch)?;

        for filter in &self.filters {
            let mask = filter.mask(batch)?;
            result = arrow::compute::and(&result, &mask)?;
        }

        Ok(result)
    }

    /// Applies the filters in sequence, stopping early once no rows remain
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut result_batch = batch.clone();

        for filter in &self.filters {
            if result_batch.num_rows() == 0 {
                return Ok(result_batch);
            }
            result_batch = filter.filter(&result_batch)?;
        }

        Ok(result_batch)
    }

    fn required_columns(&self) -> FxHashSet<String> {
        self.filters
            .iter()
            .flat_map(|filter| filter.required_columns())
            .collect()
    }
}
