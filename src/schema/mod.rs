//! Column contract for vacancy tables.
//!
//! Raw tables are located purely by column name, so the names below are
//! fixed strings shared with the table producer.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub mod adapt;

pub use adapt::DateFormatConfig;

/// Posting start date/time
pub const START_DATE: &str = "mvf_start_dt";
/// Position title
pub const POSITION_TITLE: &str = "mvf_position_title";
/// Free-text job description
pub const JOB_DESCRIPTION: &str = "mvf_job_desc";
/// Occupation name
pub const OCCUPATION_NAME: &str = "mvf_occp_name";
/// Hierarchical occupation classification code
pub const ESCO_CODE: &str = "mvf_esco";
/// Number of open positions
pub const OPEN_POSITIONS: &str = "mvf_position_open_qty";
/// Industry classification name
pub const INDUSTRY_NAME: &str = "mvf_msic1d_name";
/// Industry classification code
pub const INDUSTRY_CODE: &str = "mvf_msic1d_cd";
/// Vacancy city
pub const CITY: &str = "mvf_vac_city";
/// Vacancy state
pub const STATE: &str = "mvf_vac_state";

/// Major occupation group, the first character of the classification code
pub const MAJOR: &str = "major";
/// Posting month as `YYYY-MM`
pub const YEAR_MONTH: &str = "year_month";
/// Comma-joined keyword terms a row was selected with
pub const KEYWORD: &str = "keyword";
/// Role label a row was selected for
pub const JOB_ROLE: &str = "job_role";
/// First day of `year_month`, used for charting
pub const DATE: &str = "date";

/// The ten columns every raw table must provide, in projection order
pub const RAW_COLUMNS: [&str; 10] = [
    START_DATE,
    POSITION_TITLE,
    JOB_DESCRIPTION,
    OCCUPATION_NAME,
    ESCO_CODE,
    OPEN_POSITIONS,
    INDUSTRY_NAME,
    INDUSTRY_CODE,
    CITY,
    STATE,
];

/// Schema of a normalized vacancy table
///
/// The start date is a nullable `Date32` (null marks an unparseable
/// date), `year_month` is null for the same rows, every other column is
/// non-null text.
#[must_use]
pub fn normalized_schema() -> SchemaRef {
    let mut fields: Vec<Field> = RAW_COLUMNS
        .iter()
        .map(|&name| {
            if name == START_DATE {
                Field::new(name, DataType::Date32, true)
            } else {
                Field::new(name, DataType::Utf8, false)
            }
        })
        .collect();
    fields.push(Field::new(MAJOR, DataType::Utf8, false));
    fields.push(Field::new(YEAR_MONTH, DataType::Utf8, true));
    Arc::new(Schema::new(fields))
}

/// Schema of a filtered table: the normalized schema plus the row tags
#[must_use]
pub fn tagged_schema() -> SchemaRef {
    let base = normalized_schema();
    let mut fields: Vec<Field> = base.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(Field::new(KEYWORD, DataType::Utf8, false));
    fields.push(Field::new(JOB_ROLE, DataType::Utf8, false));
    Arc::new(Schema::new(fields))
}
