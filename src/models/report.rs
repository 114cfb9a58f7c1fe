//! Aggregated output tables of an analysis run.

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::query::RoleQuery;
use crate::schema::{
    CITY, DATE, ESCO_CODE, INDUSTRY_CODE, INDUSTRY_NAME, JOB_DESCRIPTION, JOB_ROLE, KEYWORD,
    MAJOR, OCCUPATION_NAME, OPEN_POSITIONS, POSITION_TITLE, STATE, YEAR_MONTH, tagged_schema,
};
use crate::utils::arrow::{ArrowSchema, rows_to_batch};

/// Column header of every summed count in the ranked views
pub const OPEN_POSITIONS_HEADER: &str = "Open Positions";

fn text(name: &str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

fn count(name: &str) -> Field {
    Field::new(name, DataType::UInt64, false)
}

/// One row of the base pivot: a unique key combination and its summed count
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    pub year_month: String,
    pub job_role: String,
    #[serde(rename = "mvf_position_title")]
    pub position_title: String,
    #[serde(rename = "mvf_esco")]
    pub esco_code: String,
    #[serde(rename = "mvf_occp_name")]
    pub occupation_name: String,
    #[serde(rename = "mvf_job_desc")]
    pub job_description: String,
    pub major: String,
    #[serde(rename = "mvf_msic1d_name")]
    pub industry_name: String,
    #[serde(rename = "mvf_msic1d_cd")]
    pub industry_code: String,
    #[serde(rename = "mvf_vac_city")]
    pub city: String,
    #[serde(rename = "mvf_vac_state")]
    pub state: String,
    pub keyword: String,
    #[serde(rename = "mvf_position_open_qty")]
    pub open_positions: u64,
    pub date: NaiveDate,
}

/// Open positions per month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open Positions")]
    pub open_positions: u64,
}

/// Open positions per occupation and major group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationTotal {
    #[serde(rename = "Occupation")]
    pub occupation: String,
    #[serde(rename = "Group")]
    pub major: String,
    #[serde(rename = "Open Positions")]
    pub open_positions: u64,
}

/// Open positions per state and city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTotal {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Open Positions")]
    pub open_positions: u64,
}

/// Open positions per industry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryTotal {
    #[serde(rename = "MSIC Code")]
    pub industry_code: String,
    #[serde(rename = "MSIC Name")]
    pub industry_name: String,
    #[serde(rename = "Open Positions")]
    pub open_positions: u64,
}

impl ArrowSchema for PivotRow {
    fn schema() -> Schema {
        Schema::new(vec![
            text(YEAR_MONTH),
            text(JOB_ROLE),
            text(POSITION_TITLE),
            text(ESCO_CODE),
            text(OCCUPATION_NAME),
            text(JOB_DESCRIPTION),
            text(MAJOR),
            text(INDUSTRY_NAME),
            text(INDUSTRY_CODE),
            text(CITY),
            text(STATE),
            text(KEYWORD),
            count(OPEN_POSITIONS),
            Field::new(DATE, DataType::Date32, false),
        ])
    }
}

impl ArrowSchema for TrendPoint {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("Date", DataType::Date32, false),
            count(OPEN_POSITIONS_HEADER),
        ])
    }
}

impl ArrowSchema for OccupationTotal {
    fn schema() -> Schema {
        Schema::new(vec![
            text("Occupation"),
            text("Group"),
            count(OPEN_POSITIONS_HEADER),
        ])
    }
}

impl ArrowSchema for LocationTotal {
    fn schema() -> Schema {
        Schema::new(vec![text("State"), text("City"), count(OPEN_POSITIONS_HEADER)])
    }
}

impl ArrowSchema for IndustryTotal {
    fn schema() -> Schema {
        Schema::new(vec![
            text("MSIC Code"),
            text("MSIC Name"),
            count(OPEN_POSITIONS_HEADER),
        ])
    }
}

/// Whether a run had anything to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    /// At least one row passed the filters
    Available,
    /// The table had rows but none passed the filters
    NoMatches,
    /// The table itself was empty
    NoData,
}

/// Everything one analysis run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub role: String,
    /// Catalog description of the role, when one was supplied
    pub description: Option<String>,
    pub keywords: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_state: DataState,
    /// Filtered rows, tagged with `keyword` and `job_role`
    pub filtered: RecordBatch,
    pub base_pivot: Vec<PivotRow>,
    pub trend: Vec<TrendPoint>,
    pub top_occupations: Vec<OccupationTotal>,
    pub top_locations: Vec<LocationTotal>,
    pub top_industries: Vec<IndustryTotal>,
    pub total_open_positions: u64,
}

impl AnalysisReport {
    /// An empty report for a run over an empty table
    #[must_use]
    pub fn no_data(query: &RoleQuery) -> Self {
        Self {
            role: query.role().to_string(),
            description: query.description().map(str::to_string),
            keywords: query.keywords().label(),
            start_date: query.start_date(),
            end_date: query.end_date(),
            data_state: DataState::NoData,
            filtered: RecordBatch::new_empty(tagged_schema()),
            base_pivot: Vec::new(),
            trend: Vec::new(),
            top_occupations: Vec::new(),
            top_locations: Vec::new(),
            top_industries: Vec::new(),
            total_open_positions: 0,
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data_state == DataState::Available
    }

    /// The base pivot as a spreadsheet-ready table
    pub fn base_pivot_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.base_pivot)
    }

    pub fn trend_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.trend)
    }

    pub fn occupations_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.top_occupations)
    }

    pub fn locations_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.top_locations)
    }

    pub fn industries_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.top_industries)
    }
}
