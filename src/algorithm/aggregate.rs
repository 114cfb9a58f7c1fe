//! Pivot aggregation over filtered vacancy rows
//!
//! Every view is a group-and-sum over open-position counts. Groups are
//! formed in ascending key order; the ranked views then apply a stable
//! descending sort on the count, so equal counts keep ascending key order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::models::record::TaggedRecord;
use crate::models::report::{IndustryTotal, LocationTotal, OccupationTotal, PivotRow, TrendPoint};
use crate::schema::adapt::date_utils::month_start;

/// Default number of rows kept by the ranked views
pub const DEFAULT_TOP_N: usize = 20;

/// Grouping key of the base pivot, in grouping order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PivotKey<'a> {
    year_month: &'a str,
    job_role: &'a str,
    position_title: &'a str,
    esco_code: &'a str,
    occupation_name: &'a str,
    job_description: &'a str,
    major: &'a str,
    industry_name: &'a str,
    industry_code: &'a str,
    city: &'a str,
    state: &'a str,
    keyword: &'a str,
}

/// Group filtered rows by every descriptive field plus month and sum their counts
///
/// Rows without a parseable month cannot be placed in a period and are
/// left out.
#[must_use]
pub fn base_pivot(rows: &[TaggedRecord]) -> Vec<PivotRow> {
    let mut groups: BTreeMap<PivotKey<'_>, u64> = BTreeMap::new();

    for row in rows {
        let record = &row.record;
        let Some(year_month) = record.year_month.as_deref() else {
            continue;
        };

        let key = PivotKey {
            year_month,
            job_role: &row.job_role,
            position_title: &record.position_title,
            esco_code: &record.esco_code,
            occupation_name: &record.occupation_name,
            job_description: &record.job_description,
            major: &record.major,
            industry_name: &record.industry_name,
            industry_code: &record.industry_code,
            city: &record.city,
            state: &record.state,
            keyword: &row.keyword,
        };
        let total = groups.entry(key).or_insert(0);
        *total = total.saturating_add(record.open_position_count());
    }

    groups
        .into_iter()
        .filter_map(|(key, open_positions)| {
            Some(PivotRow {
                date: month_start(key.year_month)?,
                year_month: key.year_month.to_string(),
                job_role: key.job_role.to_string(),
                position_title: key.position_title.to_string(),
                esco_code: key.esco_code.to_string(),
                occupation_name: key.occupation_name.to_string(),
                job_description: key.job_description.to_string(),
                major: key.major.to_string(),
                industry_name: key.industry_name.to_string(),
                industry_code: key.industry_code.to_string(),
                city: key.city.to_string(),
                state: key.state.to_string(),
                keyword: key.keyword.to_string(),
                open_positions,
            })
        })
        .collect()
}

/// Open positions per month, ascending by date
#[must_use]
pub fn trend(pivot: &[PivotRow]) -> Vec<TrendPoint> {
    sum_by(pivot, |row| row.date)
        .into_iter()
        .map(|(date, open_positions)| TrendPoint {
            date,
            open_positions,
        })
        .collect()
}

/// The `n` occupations with the most open positions
#[must_use]
pub fn top_occupations(pivot: &[PivotRow], n: usize) -> Vec<OccupationTotal> {
    top_n(pivot, n, |row| (row.occupation_name.as_str(), row.major.as_str()))
        .into_iter()
        .map(|((occupation, major), open_positions)| OccupationTotal {
            occupation: occupation.to_string(),
            major: major.to_string(),
            open_positions,
        })
        .collect()
}

/// The `n` locations with the most open positions
#[must_use]
pub fn top_locations(pivot: &[PivotRow], n: usize) -> Vec<LocationTotal> {
    top_n(pivot, n, |row| (row.state.as_str(), row.city.as_str()))
        .into_iter()
        .map(|((state, city), open_positions)| LocationTotal {
            state: state.to_string(),
            city: city.to_string(),
            open_positions,
        })
        .collect()
}

/// The `n` industries with the most open positions
#[must_use]
pub fn top_industries(pivot: &[PivotRow], n: usize) -> Vec<IndustryTotal> {
    top_n(pivot, n, |row| {
        (row.industry_code.as_str(), row.industry_name.as_str())
    })
    .into_iter()
    .map(|((industry_code, industry_name), open_positions)| IndustryTotal {
        industry_code: industry_code.to_string(),
        industry_name: industry_name.to_string(),
        open_positions,
    })
    .collect()
}

/// Sum of open positions across the base pivot
#[must_use]
pub fn total_open_positions(pivot: &[PivotRow]) -> u64 {
    pivot
        .iter()
        .fold(0u64, |acc, row| acc.saturating_add(row.open_positions))
}

fn sum_by<'a, K, F>(pivot: &'a [PivotRow], key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&'a PivotRow) -> K,
{
    let mut groups = BTreeMap::new();
    for row in pivot {
        let total: &mut u64 = groups.entry(key(row)).or_insert(0);
        *total = total.saturating_add(row.open_positions);
    }
    groups
}

fn top_n<'a, K, F>(pivot: &'a [PivotRow], n: usize, key: F) -> Vec<(K, u64)>
where
    K: Ord,
    F: Fn(&'a PivotRow) -> K,
{
    sum_by(pivot, key)
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(n)
        .collect()
}

/// First day of each month between two dates, inclusive
///
/// Used by presenters that want a gap-free time axis.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    use chrono::{Datelike, Months};

    let Some(mut month) = NaiveDate::from_ymd_opt(start.year(), start.month(), 1) else {
        return Vec::new();
    };
    let mut months = Vec::new();
    while month <= end {
        months.push(month);
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }
    months
}
