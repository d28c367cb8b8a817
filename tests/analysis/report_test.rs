//! Dataset report over files on disk.

use std::fs;

use advisor_synth::analysis::analyze_file;

#[test]
fn report_counts_records_context_and_skipped_lines() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("training.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"instruction\":\"38-year-old earning $95,000 wants retirement savings\",\"context\":\"\",\"response\":\"Plan A\"}\n",
            "{\"instruction\":\"Client, 61 years old, $3,000,000 in assets\",\"context\":\"HK\",\"response\":\"[Error generating response: 500]\"}\n",
            "garbage\n",
        ),
    )
    .expect("should write fixture");

    let report = analyze_file(&path).expect("should analyze");
    assert_eq!(report.records, 2);
    assert_eq!(report.skipped_lines, 1);
    assert_eq!(report.with_context, 1);
    assert_eq!(report.placeholder_responses, 1);
    assert!(report.file_size > 0);

    let ages = report.ages.expect("ages present");
    assert_eq!((ages.min, ages.max), (38, 61));
    let incomes = report.incomes.expect("income present");
    assert_eq!(incomes.count, 1);
    assert_eq!(incomes.max, 95_000);

    let rendered = report.to_string();
    assert!(rendered.contains("Total records:   2"));
    assert!(rendered.contains("retirement: 1"));
    assert!(rendered.contains("Placeholder responses: 1"));
}

#[test]
fn scored_datasets_are_readable() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("scored.jsonl");
    fs::write(
        &path,
        "{\"instruction\":\"a\",\"context\":\"\",\"response\":\"b\",\"quality_scores\":{\"overall_score\":8.0}}\n",
    )
    .expect("should write fixture");

    let report = analyze_file(&path).expect("should analyze");
    assert_eq!(report.records, 1);
    assert_eq!(report.skipped_lines, 0);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    assert!(analyze_file(&dir.path().join("nope.jsonl")).is_err());
}
