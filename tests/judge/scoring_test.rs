//! Judge scoring runs with a scripted provider.

use std::sync::Arc;
use std::time::Duration;

use advisor_synth::dataset::{read_jsonl, InstructionRecord};
use advisor_synth::judge::{sorted_path, DatasetEntry, Judge, JudgeSettings, ScoredRecord};
use advisor_synth::retry::RetryPolicy;

use crate::fake_provider::{http_error, FakeProvider};

fn dataset() -> Vec<DatasetEntry> {
    ["alpha", "beta", "gamma"]
        .iter()
        .map(|name| InstructionRecord::new(format!("brief {name}")).with_response(format!("draft {name}")))
        .map(DatasetEntry::from)
        .collect()
}

fn judge(provider: &Arc<FakeProvider>, max_samples: Option<usize>) -> Judge {
    Judge::new(
        provider.clone(),
        JudgeSettings {
            max_tokens: 1000,
            delay: Duration::ZERO,
            max_samples,
            retry: RetryPolicy::none(),
        },
    )
}

#[tokio::test]
async fn scores_every_record_and_writes_sorted_copy() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let output = dir.path().join("scored.jsonl");
    let provider = Arc::new(FakeProvider::new(vec![
        Ok("```json\n{\"overall_score\": 6.0, \"explanation\": \"decent\"}\n```".to_owned()),
        Ok("I liked it a lot".to_owned()),
        Ok("{\"overall_score\": 9.0, \"tone_confidence\": 9.5, \"strengths\": [\"clear\"]}".to_owned()),
    ]));

    let summary = judge(&provider, None)
        .score_dataset(&dataset(), &output)
        .await
        .expect("scoring should succeed");

    assert_eq!(summary.count, 3);
    assert!((summary.mean - 5.0).abs() < 1e-9);
    assert!((summary.max - 9.0).abs() < 1e-9);
    assert!(summary.min.abs() < 1e-9);
    assert_eq!(summary.at_least_8, 1);
    assert_eq!(summary.at_least_7, 1);

    let scored = read_jsonl::<ScoredRecord>(&output).expect("should read scored output");
    assert_eq!(scored.records.len(), 3);
    assert_eq!(scored.records[0].record.instruction, "brief alpha");
    assert_eq!(scored.records[0].quality_scores.explanation, "decent");
    // Unparseable reply still yields a record.
    assert_eq!(scored.records[1].record.response, "draft beta");
    assert!(scored.records[1].quality_scores.explanation.starts_with("Error:"));

    let sorted = read_jsonl::<ScoredRecord>(&sorted_path(&output)).expect("should read sorted");
    let order: Vec<&str> = sorted
        .records
        .iter()
        .map(|s| s.record.instruction.as_str())
        .collect();
    assert_eq!(order, vec!["brief gamma", "brief alpha", "brief beta"]);
    assert_eq!(sorted.records[0].quality_scores.strengths, vec!["clear".to_owned()]);
}

#[tokio::test]
async fn failed_call_records_zero_score_with_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let output = dir.path().join("scored.jsonl");
    let provider = Arc::new(FakeProvider::new(vec![Err(http_error(500))]));

    let summary = judge(&provider, Some(1))
        .score_dataset(&dataset(), &output)
        .await
        .expect("scoring should succeed");

    assert_eq!(summary.count, 1);
    let scored = read_jsonl::<ScoredRecord>(&output).expect("should read scored output");
    assert_eq!(scored.records.len(), 1);
    assert!(scored.records[0].quality_scores.overall_score.abs() < f64::EPSILON);
    assert!(scored.records[0].quality_scores.explanation.contains("500"));
}

#[tokio::test]
async fn judge_sees_instruction_and_response() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let provider = Arc::new(FakeProvider::new(vec![Ok("{\"overall_score\": 7}".to_owned())]));

    judge(&provider, Some(1))
        .score_dataset(&dataset(), &dir.path().join("scored.jsonl"))
        .await
        .expect("scoring should succeed");

    let seen = provider.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("brief alpha"));
    assert!(seen[0].contains("draft alpha"));
}

#[tokio::test]
async fn extra_fields_are_carried_into_both_outputs() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let input = dir.path().join("dataset.jsonl");
    let output = dir.path().join("scored.jsonl");
    std::fs::write(
        &input,
        "{\"instruction\":\"brief\",\"response\":\"draft\",\"source\":\"batch-7\",\"reviewed\":true}\n",
    )
    .expect("should write fixture");
    let entries = read_jsonl::<DatasetEntry>(&input).expect("should read input").records;
    let provider = Arc::new(FakeProvider::new(vec![Ok("{\"overall_score\": 8}".to_owned())]));

    judge(&provider, None)
        .score_dataset(&entries, &output)
        .await
        .expect("scoring should succeed");

    for path in [output.clone(), sorted_path(&output)] {
        let text = std::fs::read_to_string(&path).expect("output exists");
        let value: serde_json::Value =
            serde_json::from_str(text.trim()).expect("valid json line");
        assert_eq!(value["instruction"], "brief");
        assert_eq!(value["source"], "batch-7");
        assert_eq!(value["reviewed"], true);
        assert_eq!(value["quality_scores"]["overall_score"], 8.0);
    }
}
