//! Conversion between typed rows and Arrow record batches
//!
//! Output tables are plain serde structs with a declared Arrow schema;
//! `serde_arrow` serializes the rows against that schema. Dates serialize
//! as ISO strings and land in `Date32` columns.

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::error::Result;

/// Row types with a fixed Arrow representation
pub trait ArrowSchema: Serialize + Sized {
    /// Column layout; names must match the serialized field names
    fn schema() -> Schema;

    /// Serialize rows into a record batch with [`ArrowSchema::schema`]
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let schema = Self::schema();
        Ok(serde_arrow::to_record_batch(schema.fields(), &rows)?)
    }
}

/// Convert typed rows into a record batch
///
/// An empty slice still produces a batch with the full header.
pub fn rows_to_batch<T: ArrowSchema>(rows: &[T]) -> Result<RecordBatch> {
    T::to_record_batch(rows)
}
