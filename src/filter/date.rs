//! Date filtering functionality for vacancy tables
//!
//! Inclusive date-range filtering over a `Date32` column.

use arrow::array::{BooleanArray, Date32Array};
use arrow::compute::kernels::{boolean, cmp};
use arrow::compute::is_not_null;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::filter::core::BatchFilter;
use crate::schema::adapt::date_utils::date_to_days;
use crate::utils::arrow::{downcast_array, get_column};

/// A filter that includes only rows with dates in a specified range
///
/// Both bounds are inclusive. Rows with a null date never pass, even when
/// both bounds are open.
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    /// The name of the date column
    date_column: String,

    /// The start date (inclusive)
    start_date: Option<NaiveDate>,

    /// The end date (inclusive)
    end_date: Option<NaiveDate>,
}

impl DateRangeFilter {
    /// Create a new date range filter
    ///
    /// # Arguments
    /// * `date_column` - The name of the date column
    /// * `start_date` - Optional start date (inclusive)
    /// * `end_date` - Optional end date (inclusive)
    #[must_use]
    pub fn new(
        date_column: impl Into<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            start_date,
            end_date,
        }
    }

    /// Whether a single date falls within the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

impl BatchFilter for DateRangeFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let column = get_column(batch, &self.date_column)?;
        let date_array = downcast_array::<Date32Array>(&column, &self.date_column, "Date32")?;

        // Excludes null dates up front
        let mut in_range = is_not_null(date_array)?;

        if let Some(start) = self.start_date {
            let start_days = Date32Array::new_scalar(date_to_days(start));
            let ge_result = cmp::gt_eq(date_array, &start_days)?;
            in_range = boolean::and(&in_range, &ge_result)?;
        }

        if let Some(end) = self.end_date {
            let end_days = Date32Array::new_scalar(date_to_days(end));
            let le_result = cmp::lt_eq(date_array, &end_days)?;
            in_range = boolean::and(&in_range, &le_result)?;
        }

        Ok(in_range)
    }

    fn required_columns(&self) -> FxHashSet<String> {
        FxHashSet::from_iter([self.date_column.clone()])
    }
}
