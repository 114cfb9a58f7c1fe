//! Console output utilities
//!
//! Renders an analysis report as text: a headline total, a trend chart
//! and three ranked tables with title-cased labels.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::algorithm::aggregate::months_between;
use crate::catalog::RoleCatalog;
use crate::error::Result;
use crate::models::report::{
    AnalysisReport, DataState, IndustryTotal, LocationTotal, OccupationTotal,
};
use crate::utils::arrow::rows_to_batch;

/// Width of the longest bar in the trend chart
const CHART_WIDTH: usize = 50;

/// Capitalize the first letter of every word, lowercasing the rest
///
/// A word starts after any non-alphabetic character, so `"kuala-lumpur"`
/// becomes `"Kuala-Lumpur"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            result.push(ch);
            previous_alpha = false;
        }
    }
    result
}

/// Format an integer with thousands separators
#[must_use]
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

/// Render the trend as a horizontal bar chart, one line per month
///
/// Months inside the query range without postings are drawn as empty bars.
#[must_use]
pub fn render_trend_chart(report: &AnalysisReport) -> String {
    let trend = &report.trend;
    let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
        return String::new();
    };
    let start = first.date.min(report.start_date);
    let end = last.date.max(report.end_date);
    let max = trend.iter().map(|p| p.open_positions).max().unwrap_or(0).max(1);

    let mut chart = String::new();
    for month in months_between(start, end) {
        let count = trend
            .iter()
            .find(|p| p.date == month)
            .map_or(0, |p| p.open_positions);
        let width = usize::try_from(count.saturating_mul(CHART_WIDTH as u64) / max)
            .unwrap_or(CHART_WIDTH);
        chart.push_str(&format!(
            "{} | {:<pad$} {}\n",
            month.format("%Y-%m"),
            "#".repeat(width),
            format_count(count),
            pad = CHART_WIDTH
        ));
    }
    chart
}

fn titled_occupations(rows: &[OccupationTotal]) -> Vec<OccupationTotal> {
    rows.iter()
        .map(|row| OccupationTotal {
            occupation: title_case(&row.occupation),
            major: title_case(&row.major),
            open_positions: row.open_positions,
        })
        .collect()
}

fn titled_locations(rows: &[LocationTotal]) -> Vec<LocationTotal> {
    rows.iter()
        .map(|row| LocationTotal {
            state: title_case(&row.state),
            city: title_case(&row.city),
            open_positions: row.open_positions,
        })
        .collect()
}

fn titled_industries(rows: &[IndustryTotal]) -> Vec<IndustryTotal> {
    rows.iter()
        .map(|row| IndustryTotal {
            industry_code: title_case(&row.industry_code),
            industry_name: title_case(&row.industry_name),
            open_positions: row.open_positions,
        })
        .collect()
}

fn format_table(batch: &RecordBatch) -> Result<String> {
    Ok(pretty_format_batches(std::slice::from_ref(batch))?.to_string())
}

/// Render a full report as console text
pub fn format_report(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("Job role: {}\n", report.role));
    if let Some(description) = &report.description {
        out.push_str(&format!("Job description: {description}\n"));
    }
    out.push_str(&format!("Keywords: {}\n", report.keywords));
    out.push_str(&format!(
        "Filtering data from {} to {}\n\n",
        report.start_date, report.end_date
    ));

    match report.data_state {
        DataState::NoData => {
            out.push_str("No vacancy data loaded.\n");
            return Ok(out);
        }
        DataState::NoMatches => {
            out.push_str("No vacancies matched the keywords in this date range.\n");
            return Ok(out);
        }
        DataState::Available => {}
    }

    out.push_str(&format!(
        "Total job vacancies: {}\n\n",
        format_count(report.total_open_positions)
    ));

    out.push_str("Job vacancy trend over time\n");
    out.push_str(&render_trend_chart(report));

    let occupations = rows_to_batch(&titled_occupations(&report.top_occupations))?;
    out.push_str(&format!(
        "\nTop {} occupations by vacancies\n{}\n",
        report.top_occupations.len(),
        format_table(&occupations)?
    ));

    let locations = rows_to_batch(&titled_locations(&report.top_locations))?;
    out.push_str(&format!(
        "\nTop {} locations by vacancies\n{}\n",
        report.top_locations.len(),
        format_table(&locations)?
    ));

    let industries = rows_to_batch(&titled_industries(&report.top_industries))?;
    out.push_str(&format!(
        "\nTop {} industries by vacancies\n{}",
        report.top_industries.len(),
        format_table(&industries)?
    ));
    out.push('\n');

    Ok(out)
}

/// Print a full report to stdout
pub fn print_report(report: &AnalysisReport) -> Result<()> {
    println!("{}", format_report(report)?);
    Ok(())
}

/// Print the roles of a catalog with their default keywords
pub fn print_roles(catalog: &RoleCatalog) {
    for profile in catalog.profiles() {
        println!("{}", profile.role);
        println!("  Keywords: {}", profile.keywords);
        if !profile.description.is_empty() {
            println!("  Description: {}", profile.description);
        }
    }
}
