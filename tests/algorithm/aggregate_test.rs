use vacancy_pivot::algorithm::aggregate::{
    DEFAULT_TOP_N, base_pivot, months_between, top_industries, top_locations, top_occupations,
    total_open_positions, trend,
};
use vacancy_pivot::models::{TaggedRecord, VacancyRecord};

use crate::utils::date;

fn tagged(year_month: Option<&str>, count: &str) -> TaggedRecord {
    TaggedRecord {
        record: VacancyRecord {
            start_date: None,
            position_title: "data scientist".to_string(),
            job_description: "data scientist role".to_string(),
            occupation_name: "data scientist".to_string(),
            esco_code: "251201".to_string(),
            open_positions: count.to_string(),
            industry_name: "information and communication".to_string(),
            industry_code: "j".to_string(),
            city: "kl".to_string(),
            state: "wp".to_string(),
            major: "2".to_string(),
            year_month: year_month.map(str::to_string),
        },
        keyword: "data".to_string(),
        job_role: "Data Scientist".to_string(),
    }
}

fn with_occupation(mut row: TaggedRecord, occupation: &str) -> TaggedRecord {
    row.record.occupation_name = occupation.to_string();
    row
}

#[test]
fn test_base_pivot_groups_identical_keys() {
    let rows = vec![
        tagged(Some("2024-01"), "3"),
        tagged(Some("2024-01"), "2"),
        tagged(Some("2024-02"), "4"),
    ];
    let pivot = base_pivot(&rows);

    assert_eq!(pivot.len(), 2);
    assert_eq!(pivot[0].year_month, "2024-01");
    assert_eq!(pivot[0].open_positions, 5);
    assert_eq!(pivot[0].date, date(2024, 1, 1));
    assert_eq!(pivot[0].keyword, "data");
    assert_eq!(pivot[0].job_role, "Data Scientist");
    assert_eq!(pivot[1].open_positions, 4);
}

#[test]
fn test_base_pivot_coerces_counts() {
    let rows = vec![
        tagged(Some("2024-01"), "2.0"),
        tagged(Some("2024-01"), "n/a"),
        tagged(Some("2024-01"), ""),
        tagged(Some("2024-01"), "-4"),
    ];
    let pivot = base_pivot(&rows);

    assert_eq!(pivot.len(), 1);
    assert_eq!(pivot[0].open_positions, 2);
}

#[test]
fn test_rows_without_month_are_left_out() {
    let rows = vec![tagged(None, "7"), tagged(Some("2024-03"), "1")];
    let pivot = base_pivot(&rows);

    assert_eq!(pivot.len(), 1);
    assert_eq!(total_open_positions(&pivot), 1);
}

#[test]
fn test_views_conserve_the_total() {
    let rows = vec![
        with_occupation(tagged(Some("2024-01"), "3"), "analyst"),
        with_occupation(tagged(Some("2024-02"), "5"), "engineer"),
        with_occupation(tagged(Some("2024-02"), "1"), "analyst"),
        tagged(Some("2024-03"), "11"),
    ];
    let pivot = base_pivot(&rows);
    let total = total_open_positions(&pivot);
    assert_eq!(total, 20);

    let trend_total: u64 = trend(&pivot).iter().map(|p| p.open_positions).sum();
    let occupation_total: u64 = top_occupations(&pivot, usize::MAX)
        .iter()
        .map(|r| r.open_positions)
        .sum();
    let location_total: u64 = top_locations(&pivot, usize::MAX)
        .iter()
        .map(|r| r.open_positions)
        .sum();
    let industry_total: u64 = top_industries(&pivot, usize::MAX)
        .iter()
        .map(|r| r.open_positions)
        .sum();

    assert_eq!(trend_total, total);
    assert_eq!(occupation_total, total);
    assert_eq!(location_total, total);
    assert_eq!(industry_total, total);
}

#[test]
fn test_trend_is_sorted_by_month() {
    let rows = vec![
        tagged(Some("2024-03"), "1"),
        tagged(Some("2023-11"), "2"),
        tagged(Some("2024-01"), "3"),
    ];
    let points = trend(&base_pivot(&rows));

    let dates: Vec<_> = points.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date(2023, 11, 1), date(2024, 1, 1), date(2024, 3, 1)]);
}

#[test]
fn test_top_views_rank_and_truncate() {
    let rows: Vec<TaggedRecord> = (1..=25)
        .map(|i| with_occupation(tagged(Some("2024-01"), &i.to_string()), &format!("occ{i:02}")))
        .collect();
    let pivot = base_pivot(&rows);

    let top = top_occupations(&pivot, DEFAULT_TOP_N);
    assert_eq!(top.len(), 20);
    assert_eq!(top[0].occupation, "occ25");
    assert_eq!(top[0].open_positions, 25);
    assert_eq!(top[19].occupation, "occ06");
    assert!(top.windows(2).all(|w| w[0].open_positions >= w[1].open_positions));
}

#[test]
fn test_ties_keep_ascending_key_order() {
    let rows = vec![
        with_occupation(tagged(Some("2024-01"), "4"), "zoologist"),
        with_occupation(tagged(Some("2024-01"), "4"), "actuary"),
        with_occupation(tagged(Some("2024-01"), "9"), "miner"),
    ];
    let top = top_occupations(&base_pivot(&rows), 3);

    let names: Vec<_> = top.iter().map(|r| r.occupation.as_str()).collect();
    assert_eq!(names, vec!["miner", "actuary", "zoologist"]);
}

#[test]
fn test_empty_input_gives_empty_views() {
    let pivot = base_pivot(&[]);
    assert!(pivot.is_empty());
    assert!(trend(&pivot).is_empty());
    assert!(top_locations(&pivot, DEFAULT_TOP_N).is_empty());
    assert_eq!(total_open_positions(&pivot), 0);
}

#[test]
fn test_months_between_is_inclusive() {
    let months = months_between(date(2023, 11, 20), date(2024, 2, 1));
    assert_eq!(
        months,
        vec![
            date(2023, 11, 1),
            date(2023, 12, 1),
            date(2024, 1, 1),
            date(2024, 2, 1)
        ]
    );
    assert!(months_between(date(2024, 3, 1), date(2024, 1, 1)).is_empty());
}
