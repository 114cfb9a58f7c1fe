//! Role filtering configuration.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{Error, Result};
use crate::filter::keyword::{KeywordSet, MatchMode};

/// The filtering configuration for one analysis run
///
/// The role is only a label carried into the output; matching is driven
/// entirely by the keyword set and the inclusive date range.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleQuery {
    role: String,
    keywords: KeywordSet,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: Option<String>,
}

impl RoleQuery {
    /// Create a query for `role`
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] if `start_date` is after `end_date`.
    pub fn new(
        role: impl Into<String>,
        keywords: KeywordSet,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if start_date > end_date {
            return Err(Error::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            role: role.into(),
            keywords,
            start_date,
            end_date,
            description: None,
        })
    }

    /// Create a query from a comma-separated keyword string
    ///
    /// # Errors
    /// Returns an error for an invalid keyword or an inverted date range.
    pub fn parse(
        role: impl Into<String>,
        keywords: &str,
        mode: MatchMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(role, KeywordSet::parse(keywords, mode)?, start_date, end_date)
    }

    /// Attach the role description shown next to the analysis
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Default analysis window relative to `today`
///
/// Runs from the first day of the current month two years back to the
/// last day of the previous month.
#[must_use]
pub fn default_date_range(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let month_start = today.checked_sub_days(Days::new(u64::from(today.day0())))?;
    let start = month_start.checked_sub_months(Months::new(24))?;
    let end = month_start.pred_opt()?;
    Some((start, end))
}
