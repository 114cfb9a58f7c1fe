//! Table loading for CSV and Parquet files
//!
//! CSV columns are all read as nullable text so loosely typed exports
//! (mixed numeric and text cells, odd date formats) load without schema
//! inference failures; the normalizer does the typing.

use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Detect the format from a file extension
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an unknown extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "parq") => Ok(Self::Parquet),
            _ => Err(Error::Config(format!(
                "unsupported table format: {}",
                path.display()
            ))),
        }
    }
}

/// Load a table file into record batches, choosing the reader by extension
pub fn load_table(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv(path, batch_size),
        TableFormat::Parquet => read_parquet(path, batch_size),
    }
}

/// Read a CSV file with a header row, every column as nullable text
pub fn read_csv(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    log_operation_start("Reading CSV", path);
    let start = Instant::now();

    let mut file = safe_open_file(path, "reading CSV table")?;

    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(&mut file, Some(1))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| Error::io("Failed to rewind CSV file", path, e))?;

    let schema = Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_batch_size(batch_size)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", path, rows, Some(start.elapsed()));
    Ok(batches)
}

/// Read a Parquet file into record batches
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    log_operation_start("Reading Parquet", path);
    let start = Instant::now();

    let file = safe_open_file(path, "reading Parquet table")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_size)
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let rows = batches.iter().map(RecordBatch::num_rows).sum();
    log_operation_complete("read", path, rows, Some(start.elapsed()));
    Ok(batches)
}
