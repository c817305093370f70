//! End-to-end checks of the validation summary through the public API.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use leadcheck_core::{
    Dataset, DatasetSource, IngestConfig, IngestSource, QualityAnalyzer, QualityTier, Row,
    ValidationConfig, create_loader, sample_dataset, summarize,
};
use serde_json::json;

fn dataset(values: Vec<serde_json::Value>) -> Dataset {
    let rows = values.into_iter().filter_map(Row::from_json).collect();
    Dataset::from_rows(rows, DatasetSource::Sample)
}

#[test]
fn total_rows_matches_row_count() {
    for size in [0_i64, 1, 7, 64] {
        let values = (0..size)
            .map(|i| {
                let email = if i % 2 == 0 { json!("a@b.co") } else { json!(null) };
                json!({"id": i % 3, "email": email})
            })
            .collect();
        let data = dataset(values);
        assert_eq!(summarize(&data).total_rows, data.rows.len() as u64);
    }
}

#[test]
fn empty_dataset_summary() {
    let summary = summarize(&dataset(vec![]));

    assert_eq!(summary.total_rows, 0);
    assert_eq!(summary.missing_values, 0);
    assert_eq!(summary.duplicate_rows, 0);
    assert_eq!(summary.valid_email_display(), "0.0");
    assert_eq!(summary.quality_tier, QualityTier::Poor);
}

#[test]
fn repeated_row_counts_once() {
    let summary = summarize(&dataset(vec![
        json!({"id": 1, "email": "a@b.com"}),
        json!({"id": 1, "email": "a@b.com"}),
    ]));
    assert_eq!(summary.duplicate_rows, 1);
}

#[test]
fn one_of_two_emails_valid() {
    let summary = summarize(&dataset(vec![
        json!({"email": "x"}),
        json!({"email": "a@b.co"}),
    ]));
    assert_eq!(summary.valid_email_percentage, 50.0);
}

#[test]
fn single_null_field_is_one_missing_value() {
    let summary = summarize(&dataset(vec![
        json!({"id": 1, "email": null}),
        json!({"id": 2, "email": "b@c.com"}),
    ]));
    assert_eq!(summary.missing_values, 1);
}

#[test]
fn extra_key_outside_columns_keeps_excellent_tier() {
    let rows = vec![
        Row::new()
            .with("id", "U001")
            .with("email", "john@example.com")
            .with("note", "x"),
        Row::new().with("id", "U002").with("email", "sarah@example.com"),
        Row::new().with("id", "U003").with("email", "mike@example.com"),
    ];
    let data = Dataset::new(
        vec!["id".to_string(), "email".to_string()],
        rows,
        DatasetSource::Upload {
            file_name: "leads.csv".to_string(),
        },
    );

    let summary = summarize(&data);

    assert_eq!(summary.missing_values, 0);
    assert_eq!(summary.quality_tier, QualityTier::Excellent);
}

#[test]
fn duplicates_block_excellent_tier() {
    let mut values: Vec<serde_json::Value> = (0..24)
        .map(|i| json!({"id": i, "email": format!("lead{}@example.com", i)}))
        .collect();
    values[0] = json!({"id": 0, "email": "broken"});
    values.push(json!({"id": 1, "email": "lead1@example.com"}));

    let summary = summarize(&dataset(values));

    assert_eq!(summary.valid_email_percentage, 96.0);
    assert_eq!(summary.duplicate_rows, 1);
    assert_eq!(summary.quality_tier, QualityTier::Good);
}

#[test]
fn sample_dataset_is_excellent() {
    let summary = summarize(&sample_dataset());

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.missing_values, 0);
    assert_eq!(summary.duplicate_rows, 0);
    assert_eq!(summary.valid_email_percentage, 100.0);
    assert_eq!(summary.quality_tier, QualityTier::Excellent);
}

#[test]
fn summary_is_recomputed_per_dataset() {
    let analyzer = QualityAnalyzer::new(ValidationConfig::default());

    let first = analyzer.summarize(&sample_dataset());
    let second = analyzer.summarize(&dataset(vec![json!({"email": ""})]));

    assert_eq!(first.total_rows, 5);
    assert_eq!(second.total_rows, 1);
    assert_eq!(second.missing_values, 1);
    assert_eq!(second.quality_tier, QualityTier::Poor);
}

#[tokio::test]
async fn csv_file_integration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marketing_dataset.csv");
    std::fs::write(
        &path,
        "id,email,age,location,engagement\n\
         U001,john@example.com,28,NY,0.85\n\
         U002,sarah@example,34,CA,0.72\n\
         U003,,41,TX,0.91\n\
         U001,john@example.com,28,NY,0.85\n\
         U004,emma@example.com,29,FL\n",
    )
    .unwrap();

    let loader = create_loader(IngestSource::LocalFile(path), IngestConfig::default()).unwrap();
    let data = loader.load().await.unwrap();
    let summary = summarize(&data);

    assert_eq!(data.preview(5).len(), 5);
    assert_eq!(summary.total_rows, 5);
    // U003's empty email plus U004's absent engagement
    assert_eq!(summary.missing_values, 2);
    assert_eq!(summary.duplicate_rows, 1);
    assert_eq!(summary.valid_email_count, 3);
    assert_eq!(summary.valid_email_percentage, 60.0);
    assert_eq!(summary.quality_tier, QualityTier::Poor);
}

#[tokio::test]
async fn json_file_integration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "U001", "email": "john@example.com", "engaged": true},
            {"id": "U002", "email": "sarah@example.com", "engaged": false},
            "not a row"
        ]"#,
    )
    .unwrap();

    let loader = create_loader(IngestSource::LocalFile(path), IngestConfig::default()).unwrap();
    let data = loader.load().await.unwrap();
    let summary = summarize(&data);

    assert_eq!(data.columns, vec!["id", "email", "engaged"]);
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.quality_tier, QualityTier::Excellent);
}
