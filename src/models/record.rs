//! Typed views of normalized and filtered vacancy rows.

use arrow::array::{Array, Date32Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::adapt::date_utils::days_to_date;
use crate::schema::{
    CITY, ESCO_CODE, INDUSTRY_CODE, INDUSTRY_NAME, JOB_DESCRIPTION, JOB_ROLE, KEYWORD, MAJOR,
    OCCUPATION_NAME, OPEN_POSITIONS, POSITION_TITLE, START_DATE, STATE, YEAR_MONTH,
};
use crate::utils::arrow::{column_as_text, downcast_array, get_column};

/// One normalized vacancy posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    /// `None` when the raw start date could not be parsed
    pub start_date: Option<NaiveDate>,
    pub position_title: String,
    pub job_description: String,
    pub occupation_name: String,
    pub esco_code: String,
    /// Raw cell text of the open-position count; see [`coerce_open_positions`]
    pub open_positions: String,
    pub industry_name: String,
    pub industry_code: String,
    pub city: String,
    pub state: String,
    pub major: String,
    pub year_month: Option<String>,
}

impl VacancyRecord {
    /// Open-position count coerced to a number
    #[must_use]
    pub fn open_position_count(&self) -> u64 {
        coerce_open_positions(&self.open_positions)
    }

    /// Read every row of a normalized table
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let date_column = get_column(batch, START_DATE)?;
        let start_dates = downcast_array::<Date32Array>(&date_column, START_DATE, "Date32")?;
        let year_month_column = get_column(batch, YEAR_MONTH)?;
        let year_months = downcast_array::<StringArray>(&year_month_column, YEAR_MONTH, "String")?;

        let mut position_title = column_as_text(batch, POSITION_TITLE)?.into_iter();
        let mut job_description = column_as_text(batch, JOB_DESCRIPTION)?.into_iter();
        let mut occupation_name = column_as_text(batch, OCCUPATION_NAME)?.into_iter();
        let mut esco_code = column_as_text(batch, ESCO_CODE)?.into_iter();
        let mut open_positions = column_as_text(batch, OPEN_POSITIONS)?.into_iter();
        let mut industry_name = column_as_text(batch, INDUSTRY_NAME)?.into_iter();
        let mut industry_code = column_as_text(batch, INDUSTRY_CODE)?.into_iter();
        let mut city = column_as_text(batch, CITY)?.into_iter();
        let mut state = column_as_text(batch, STATE)?.into_iter();
        let mut major = column_as_text(batch, MAJOR)?.into_iter();

        let records = (0..batch.num_rows())
            .map(|row| Self {
                start_date: if start_dates.is_null(row) {
                    None
                } else {
                    days_to_date(start_dates.value(row))
                },
                position_title: position_title.next().unwrap_or_default(),
                job_description: job_description.next().unwrap_or_default(),
                occupation_name: occupation_name.next().unwrap_or_default(),
                esco_code: esco_code.next().unwrap_or_default(),
                open_positions: open_positions.next().unwrap_or_default(),
                industry_name: industry_name.next().unwrap_or_default(),
                industry_code: industry_code.next().unwrap_or_default(),
                city: city.next().unwrap_or_default(),
                state: state.next().unwrap_or_default(),
                major: major.next().unwrap_or_default(),
                year_month: (!year_months.is_null(row))
                    .then(|| year_months.value(row).to_string()),
            })
            .collect();

        Ok(records)
    }
}

/// A filtered row together with the role and keyword tags it was selected with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    pub record: VacancyRecord,
    pub keyword: String,
    pub job_role: String,
}

impl TaggedRecord {
    /// Read every row of a tagged (filtered) table
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let records = VacancyRecord::from_batch(batch)?;
        let keywords = column_as_text(batch, KEYWORD)?;
        let roles = column_as_text(batch, JOB_ROLE)?;

        Ok(records
            .into_iter()
            .zip(keywords)
            .zip(roles)
            .map(|((record, keyword), job_role)| Self {
                record,
                keyword,
                job_role,
            })
            .collect())
    }
}

/// Coerce an open-position cell to a count
///
/// Integers parse directly; finite non-negative decimals (`"3.0"`) are
/// truncated. Empty, negative or non-numeric cells count as zero.
#[must_use]
pub fn coerce_open_positions(raw: &str) -> u64 {
    let value = raw.trim();
    if let Ok(count) = value.parse::<u64>() {
        return count;
    }

    match value.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(count) if count.is_finite() && count >= 0.0 => count.trunc() as u64,
        _ => 0,
    }
}
