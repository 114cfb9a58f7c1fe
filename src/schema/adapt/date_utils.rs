//! Module for handling date parsing and formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::schema::adapt::types::DateFormatConfig;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse a date string with multiple format attempts
///
/// Date-time strings are accepted and truncated to their date. Returns
/// `None` for empty or unrecognised input.
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in &config.datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }

    // Offsets ("2024-01-15T08:00:00+08:00") keep their local calendar date
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.date_naive());
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, &detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<String> {
    // Check for ISO-like format with dashes (YYYY-MM-DD)
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d".to_string());
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d".to_string());
            } else if parts[2].len() == 4 {
                return Some("%d/%m/%Y".to_string());
            }
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y".to_string());
        }
    }

    // Check for compact format (YYYYMMDD)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d".to_string());
    }

    None
}

/// Convert a date into Arrow `Date32` days since the Unix epoch
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert Arrow `Date32` days since the Unix epoch back into a date
#[must_use]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Format a date at month granularity (`YYYY-MM`)
#[must_use]
pub fn year_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// First day of the month named by a `YYYY-MM` string
#[must_use]
pub fn month_start(year_month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{year_month}-01"), "%Y-%m-%d").ok()
}
