//! Normalization of raw vacancy tables
//!
//! Turns loosely typed raw batches into the canonical table every analysis
//! run starts from:
//!
//! 1. project to the ten contract columns, rendering each as text with
//!    nulls as `""`;
//! 2. lowercase the text-typed columns;
//! 3. concatenate in upload order and keep the first row per
//!    (description, classification code);
//! 4. parse the start date into `Date32` (null when unparseable) and
//!    derive `major` and `year_month`.
//!
//! Normalization is a pure function of its input and is idempotent.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Date32Array, StringArray};
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::filter::filter_record_batch;
use crate::models::record::VacancyRecord;
use crate::schema::adapt::date_utils::{date_to_days, parse_date_string, year_month};
use crate::schema::{
    DateFormatConfig, ESCO_CODE, JOB_DESCRIPTION, RAW_COLUMNS, START_DATE, normalized_schema,
};
use crate::utils::arrow::{column_as_utf8, downcast_array, get_column};

/// An immutable, normalized vacancy table
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    batch: RecordBatch,
}

impl NormalizedTable {
    /// The table as a single record batch with [`normalized_schema`]
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Typed copies of every row
    pub fn records(&self) -> Result<Vec<VacancyRecord>> {
        VacancyRecord::from_batch(&self.batch)
    }
}

/// Normalize raw batches into a [`NormalizedTable`]
///
/// Batches are taken in the given order, which is treated as the upload
/// order for deduplication. Columns beyond the ten contract columns are
/// dropped.
///
/// # Errors
/// Returns [`crate::Error::ColumnNotFound`] if a batch lacks a contract column.
pub fn normalize(batches: &[RecordBatch], dates: &DateFormatConfig) -> Result<NormalizedTable> {
    let text_schema = raw_text_schema();

    let projected = batches
        .iter()
        .map(|batch| project_batch(batch, &text_schema))
        .collect::<Result<Vec<_>>>()?;
    let combined = concat_batches(&text_schema, &projected)?;

    let deduplicated = filter_record_batch(&combined, &first_occurrence_mask(&combined)?)?;
    let batch = derive_columns(&deduplicated, dates)?;

    Ok(NormalizedTable { batch })
}

/// The ten contract columns as non-null text
fn raw_text_schema() -> SchemaRef {
    Arc::new(Schema::new(
        RAW_COLUMNS
            .iter()
            .map(|&name| Field::new(name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ))
}

fn is_text(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}

/// Project one raw batch onto the text schema, filling nulls and lowercasing text
fn project_batch(batch: &RecordBatch, text_schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = RAW_COLUMNS
        .iter()
        .map(|&name| {
            let lowercase = is_text(get_column(batch, name)?.data_type());
            let values = column_as_utf8(batch, name)?;
            let filled: StringArray = values
                .iter()
                .map(|value| {
                    let value = value.unwrap_or_default();
                    Some(if lowercase {
                        value.to_lowercase()
                    } else {
                        value.to_string()
                    })
                })
                .collect();
            Ok(Arc::new(filled) as ArrayRef)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordBatch::try_new(Arc::clone(text_schema), columns)?)
}

/// Keep-mask selecting the first row of every (description, code) pair
fn first_occurrence_mask(batch: &RecordBatch) -> Result<BooleanArray> {
    let description_column = get_column(batch, JOB_DESCRIPTION)?;
    let descriptions = downcast_array::<StringArray>(&description_column, JOB_DESCRIPTION, "String")?;
    let code_column = get_column(batch, ESCO_CODE)?;
    let codes = downcast_array::<StringArray>(&code_column, ESCO_CODE, "String")?;

    let mut seen = FxHashSet::default();
    Ok((0..batch.num_rows())
        .map(|row| Some(seen.insert((descriptions.value(row), codes.value(row)))))
        .collect())
}

/// Replace the start date text with `Date32` and append `major` and `year_month`
fn derive_columns(batch: &RecordBatch, dates: &DateFormatConfig) -> Result<RecordBatch> {
    let start_column = get_column(batch, START_DATE)?;
    let start_text = downcast_array::<StringArray>(&start_column, START_DATE, "String")?;
    let parsed: Vec<_> = start_text
        .iter()
        .map(|value| value.and_then(|v| parse_date_string(v, dates)))
        .collect();

    let start_dates: Date32Array = parsed.iter().map(|date| date.map(date_to_days)).collect();
    let year_months: StringArray = parsed.iter().map(|date| date.map(year_month)).collect();

    let code_column = get_column(batch, ESCO_CODE)?;
    let codes = downcast_array::<StringArray>(&code_column, ESCO_CODE, "String")?;
    let majors: StringArray = codes
        .iter()
        .map(|code| Some(code.unwrap_or_default().chars().take(1).collect::<String>()))
        .collect();

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(RAW_COLUMNS.len() + 2);
    for (idx, &name) in RAW_COLUMNS.iter().enumerate() {
        if name == START_DATE {
            columns.push(Arc::new(start_dates.clone()));
        } else {
            columns.push(Arc::clone(batch.column(idx)));
        }
    }
    columns.push(Arc::new(majors));
    columns.push(Arc::new(year_months));

    Ok(RecordBatch::try_new(normalized_schema(), columns)?)
}
