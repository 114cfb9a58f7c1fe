use std::sync::Arc;

use arrow::array::StringArray;
use vacancy_pivot::filter::{
    AndFilter, BatchFilter, DateRangeFilter, EmptyKeywordPolicy, ExcludeAllFilter,
    IncludeAllFilter, KeywordFilter, KeywordSet, MatchMode,
};
use vacancy_pivot::schema::{JOB_DESCRIPTION, START_DATE};
use vacancy_pivot::Error;

use crate::utils::{RawVacancy, date, normalized};

fn descriptions(batch: &arrow::record_batch::RecordBatch) -> Vec<String> {
    batch
        .column_by_name(JOB_DESCRIPTION)
        .expect("description column")
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("text column")
        .iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

fn dated_rows() -> Vec<RawVacancy> {
    vec![
        RawVacancy::new("2023-12-31", "before", "1"),
        RawVacancy::new("2024-01-01", "first day", "1"),
        RawVacancy::new("2024-01-31", "last day", "1"),
        RawVacancy::new("2024-02-01", "after", "1"),
        RawVacancy::new("unknown", "undated", "1"),
    ]
}

#[test]
fn test_basic_filters() {
    let table = normalized(&dated_rows());

    let all = IncludeAllFilter.filter(table.batch()).expect("filters");
    assert_eq!(all.num_rows(), 5);

    let none = ExcludeAllFilter.filter(table.batch()).expect("filters");
    assert_eq!(none.num_rows(), 0);
    assert_eq!(none.schema(), table.batch().schema());
}

#[test]
fn test_date_range_is_inclusive() {
    let table = normalized(&dated_rows());
    let filter = DateRangeFilter::new(
        START_DATE,
        Some(date(2024, 1, 1)),
        Some(date(2024, 1, 31)),
    );

    let filtered = filter.filter(table.batch()).expect("filters");
    assert_eq!(descriptions(&filtered), vec!["first day", "last day"]);

    assert!(filter.contains(date(2024, 1, 1)));
    assert!(filter.contains(date(2024, 1, 31)));
    assert!(!filter.contains(date(2024, 2, 1)));
}

#[test]
fn test_unparseable_dates_never_pass() {
    let table = normalized(&dated_rows());

    let open = DateRangeFilter::new(START_DATE, None, None);
    let filtered = open.filter(table.batch()).expect("filters");
    assert_eq!(filtered.num_rows(), 4);
    assert!(!descriptions(&filtered).contains(&"undated".to_string()));
}

#[test]
fn test_date_filter_requires_date_column() {
    let table = normalized(&dated_rows());
    let filter = DateRangeFilter::new("posted_on", None, None);

    assert!(matches!(
        filter.filter(table.batch()),
        Err(Error::ColumnNotFound { .. })
    ));
    assert!(filter.required_columns().contains("posted_on"));
}

#[test]
fn test_keyword_filter_is_case_insensitive_substring() {
    let rows = vec![
        RawVacancy::new("2024-01-01", "Senior Data Scientist", "1"),
        RawVacancy::new("2024-01-01", "metadata curator", "1"),
        RawVacancy::new("2024-01-01", "chef", "1"),
    ];
    let table = normalized(&rows);
    let keywords = KeywordSet::parse("DATA", MatchMode::Pattern).expect("keywords");
    let filter = KeywordFilter::new(JOB_DESCRIPTION, keywords, EmptyKeywordPolicy::MatchNone);

    let filtered = filter.filter(table.batch()).expect("filters");
    assert_eq!(
        descriptions(&filtered),
        vec!["senior data scientist", "metadata curator"]
    );
}

#[test]
fn test_keyword_filter_keeps_terms_differing_in_case() {
    let rows = vec![
        RawVacancy::new("2024-01-01", "Data Science lead", "1"),
        RawVacancy::new("2024-01-01", "data-driven marketer", "1"),
        RawVacancy::new("2024-01-01", "chef", "1"),
    ];
    let table = normalized(&rows);
    let keywords = KeywordSet::parse(r"data\s, data\S", MatchMode::Pattern).expect("keywords");
    assert_eq!(keywords.label(), r"data\s, data\S");

    let filter = KeywordFilter::new(JOB_DESCRIPTION, keywords, EmptyKeywordPolicy::MatchNone);
    let filtered = filter.filter(table.batch()).expect("filters");
    assert_eq!(
        descriptions(&filtered),
        vec!["data science lead", "data-driven marketer"]
    );
}

#[test]
fn test_keyword_set_parsing() {
    let keywords =
        KeywordSet::parse(" python , , Machine Learning,PYTHON ", MatchMode::Pattern)
            .expect("keywords");

    assert_eq!(keywords.terms(), ["python", "Machine Learning", "PYTHON"]);
    assert_eq!(keywords.label(), "python, Machine Learning, PYTHON");
    assert!(keywords.matches("we use machine learning daily"));
    assert!(!keywords.matches("we cook"));
}

#[test]
fn test_pattern_and_literal_modes() {
    let pattern = KeywordSet::parse("c\\+\\+|rust", MatchMode::Pattern).expect("keywords");
    assert!(pattern.matches("rust developer"));
    assert!(pattern.matches("c++ developer"));

    let literal = KeywordSet::parse("c++", MatchMode::Literal).expect("keywords");
    assert!(literal.matches("senior c++ developer"));
    assert!(!literal.matches("senior c developer"));
    assert!(KeywordSet::parse("(unclosed", MatchMode::Literal).is_ok());

    let invalid = KeywordSet::parse("python, (unclosed", MatchMode::Pattern);
    assert!(matches!(invalid, Err(Error::InvalidKeyword { .. })));
}

#[test]
fn test_empty_keyword_policies() {
    let table = normalized(&dated_rows());
    let empty = KeywordSet::parse("  ,  ", MatchMode::Pattern).expect("keywords");
    assert!(empty.is_empty());
    assert!(!empty.matches("anything"));

    let match_none =
        KeywordFilter::new(JOB_DESCRIPTION, empty.clone(), EmptyKeywordPolicy::MatchNone);
    assert_eq!(match_none.filter(table.batch()).expect("filters").num_rows(), 0);

    let match_all = KeywordFilter::new(JOB_DESCRIPTION, empty, EmptyKeywordPolicy::MatchAll);
    assert_eq!(match_all.filter(table.batch()).expect("filters").num_rows(), 5);
}

#[test]
fn test_and_filter_combines_date_and_keyword() {
    let table = normalized(&dated_rows());
    let keywords = KeywordSet::parse("day", MatchMode::Pattern).expect("keywords");

    let filters: Vec<Arc<dyn BatchFilter + Send + Sync>> = vec![
        Arc::new(DateRangeFilter::new(
            START_DATE,
            Some(date(2024, 1, 15)),
            None,
        )),
        Arc::new(KeywordFilter::new(
            JOB_DESCRIPTION,
            keywords,
            EmptyKeywordPolicy::MatchNone,
        )),
    ];
    let combined = AndFilter::new(filters);

    let filtered = combined.filter(table.batch()).expect("filters");
    assert_eq!(descriptions(&filtered), vec!["last day"]);

    let required = combined.required_columns();
    assert!(required.contains(START_DATE));
    assert!(required.contains(JOB_DESCRIPTION));
}
