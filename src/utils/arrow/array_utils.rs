//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting and converting
//! data from Arrow arrays, handling type conversion and error handling.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Error, Result};

/// Get a required column from a record batch by name
///
/// # Errors
/// Returns [`Error::ColumnNotFound`] if the batch has no such column.
pub fn get_column(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| Error::column_not_found(column_name))?;
    Ok(Arc::clone(batch.column(idx)))
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| Error::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Read any column as a `Utf8` string array
///
/// Non-text columns are rendered with Arrow's cast kernel, so a numeric
/// `5` becomes `"5"` and a `Date32` becomes `"2024-01-15"`.
pub fn column_as_utf8(batch: &RecordBatch, column_name: &str) -> Result<StringArray> {
    let column = get_column(batch, column_name)?;

    let column = match column.data_type() {
        DataType::Utf8 => column,
        other => {
            debug!("Casting column '{column_name}' from {other:?} to Utf8");
            cast(&column, &DataType::Utf8)?
        }
    };

    Ok(downcast_array::<StringArray>(&column, column_name, "String")?.clone())
}

/// Read a column as owned text values, mapping nulls to `""`
pub fn column_as_text(batch: &RecordBatch, column_name: &str) -> Result<Vec<String>> {
    let array = column_as_utf8(batch, column_name)?;
    Ok(array
        .iter()
        .map(|value| value.map(str::to_string).unwrap_or_default())
        .collect())
}
