//! Domain types: vacancy rows, role queries and analysis output tables.

pub mod query;
pub mod record;
pub mod report;

pub use query::{RoleQuery, default_date_range};
pub use record::{TaggedRecord, VacancyRecord, coerce_open_positions};
pub use report::{
    AnalysisReport, DataState, IndustryTotal, LocationTotal, OccupationTotal, PivotRow,
    TrendPoint,
};
