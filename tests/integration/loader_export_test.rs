use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use vacancy_pivot::loader::{TableFormat, load_table};
use vacancy_pivot::models::TrendPoint;
use vacancy_pivot::schema::{OPEN_POSITIONS, START_DATE};
use vacancy_pivot::utils::io::csv::{
    BASE_PIVOT_FILE, INDUSTRIES_FILE, LOCATIONS_FILE, OCCUPATIONS_FILE, TREND_FILE,
};
use vacancy_pivot::utils::io::{export_report, write_csv};
use vacancy_pivot::{AnalysisConfig, AnalysisSession, Error, analyze};

use crate::utils::{date, normalized, query, raw_batch, three_postings};

const VACANCY_CSV: &str = "\
mvf_start_dt,mvf_position_title,mvf_job_desc,mvf_occp_name,mvf_esco,mvf_position_open_qty,mvf_msic1d_name,mvf_msic1d_cd,mvf_vac_city,mvf_vac_state,mvf_notes
2024-01-15,Data Scientist,Data Scientist Role,Data Scientist,251201,5,Information,J,KL,WP,first
2024-02-10,Data Analyst,data analyst position,Data Analyst,251201,3.0,Information,J,KL,WP,
2024-02-11,Data Analyst,DATA ANALYST POSITION,Data Analyst,251201,9,Information,J,KL,WP,duplicate
bad date,Chef,chef wanted,Cook,941201,,Food,I,JB,Johor,
";

fn write_vacancies(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("vacancies.csv");
    fs::write(&path, VACANCY_CSV).expect("write vacancies");
    path
}

fn read_back(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read export")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_table_format_detection() {
    assert_eq!(
        TableFormat::from_path(Path::new("data/vacancies.CSV")).expect("format"),
        TableFormat::Csv
    );
    assert_eq!(
        TableFormat::from_path(Path::new("vacancies.parquet")).expect("format"),
        TableFormat::Parquet
    );
    assert!(matches!(
        TableFormat::from_path(Path::new("vacancies.xlsx")),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_csv_load_and_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_vacancies(dir.path());

    let batches = load_table(&path, 2).expect("loads");
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 4);
    assert_eq!(batches[0].num_columns(), 11);

    let config = AnalysisConfig {
        data_path: Some(path),
        ..AnalysisConfig::default()
    };
    let session = AnalysisSession::open(config).expect("session opens");
    assert_eq!(session.table().num_rows(), 3);
    assert_eq!(session.unparsed_start_dates(), 1);

    let report = session
        .analyze(&query("Data", "data", date(2024, 1, 1), date(2024, 12, 31)))
        .expect("analyzes");
    assert_eq!(report.total_open_positions, 8);
}

/// The three postings with a millisecond timestamp start date and integer counts
fn typed_postings() -> RecordBatch {
    let text = raw_batch(&three_postings());
    let days = [date(2024, 1, 15), date(2024, 2, 10), date(2024, 3, 1)];
    let starts: TimestampMillisecondArray = days
        .iter()
        .map(|day| day.and_hms_opt(9, 30, 0).map(|t| t.and_utc().timestamp_millis()))
        .collect();
    let counts = Int64Array::from(vec![Some(5), Some(3), None]);

    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();
    for (field, column) in text.schema().fields().iter().zip(text.columns()) {
        match field.name().as_str() {
            START_DATE => {
                fields.push(Field::new(
                    START_DATE,
                    DataType::Timestamp(TimeUnit::Millisecond, None),
                    true,
                ));
                columns.push(Arc::new(starts.clone()));
            }
            OPEN_POSITIONS => {
                fields.push(Field::new(OPEN_POSITIONS, DataType::Int64, true));
                columns.push(Arc::new(counts.clone()));
            }
            _ => {
                fields.push(field.as_ref().clone());
                columns.push(Arc::clone(column));
            }
        }
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).expect("valid typed batch")
}

#[test]
fn test_parquet_load_and_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("vacancies.parquet");
    let batch = typed_postings();

    let file = fs::File::create(&path).expect("create parquet");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("parquet writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");

    let batches = load_table(&path, 2).expect("loads");
    assert_eq!(batches.iter().map(RecordBatch::num_rows).sum::<usize>(), 3);
    assert_eq!(
        batches[0].schema().field_with_name(START_DATE).expect("start date").data_type(),
        &DataType::Timestamp(TimeUnit::Millisecond, None)
    );

    let config = AnalysisConfig {
        data_path: Some(path),
        ..AnalysisConfig::default()
    };
    let session = AnalysisSession::open(config).expect("session opens");
    assert_eq!(session.table().num_rows(), 3);
    assert_eq!(session.unparsed_start_dates(), 0);

    let report = session
        .analyze(&query("Data Scientist", "data", date(2024, 1, 1), date(2024, 2, 28)))
        .expect("analyzes");
    assert_eq!(report.total_open_positions, 8);
    assert_eq!(
        report.trend,
        vec![
            TrendPoint {
                date: date(2024, 1, 1),
                open_positions: 5
            },
            TrendPoint {
                date: date(2024, 2, 1),
                open_positions: 3
            },
        ]
    );
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = load_table(&dir.path().join("absent.csv"), 1024);
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_export_report_writes_every_view() {
    let dir = tempfile::tempdir().expect("temp dir");
    let table = normalized(&three_postings());
    let report = analyze(
        Some(&table),
        &query("Data Scientist", "data", date(2024, 1, 1), date(2024, 2, 28)),
        &AnalysisConfig::default(),
    )
    .expect("analyzes");

    let out = dir.path().join("export");
    let written = export_report(&out, &report).expect("exports");
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        names,
        vec![BASE_PIVOT_FILE, TREND_FILE, OCCUPATIONS_FILE, LOCATIONS_FILE, INDUSTRIES_FILE]
    );

    let trend = read_back(&out.join(TREND_FILE));
    assert_eq!(trend, vec!["Date,Open Positions", "2024-01-01,5", "2024-02-01,3"]);

    let pivot = read_back(&out.join(BASE_PIVOT_FILE));
    assert_eq!(pivot.len(), 3);
    assert!(pivot[0].starts_with("year_month,job_role,mvf_position_title"));
    assert!(pivot[0].ends_with("keyword,mvf_position_open_qty,date"));
    assert!(pivot[1].starts_with("2024-01,Data Scientist,"));

    let locations = read_back(&out.join(LOCATIONS_FILE));
    assert_eq!(locations, vec!["State,City,Open Positions", "wp,kl,8"]);
}

#[test]
fn test_export_empty_report_keeps_headers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let table = normalized(&three_postings());
    let report = analyze(
        Some(&table),
        &query("Astronaut", "astronaut", date(2024, 1, 1), date(2024, 2, 28)),
        &AnalysisConfig::default(),
    )
    .expect("analyzes");

    export_report(dir.path(), &report).expect("exports");
    let occupations = read_back(&dir.path().join(OCCUPATIONS_FILE));
    assert_eq!(occupations, vec!["Occupation,Group,Open Positions"]);
}

#[test]
fn test_write_csv_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("raw.csv");
    let batch = raw_batch(&three_postings());

    write_csv(&path, &[batch]).expect("writes");
    let lines = read_back(&path);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("mvf_start_dt,"));
}
