//! Line-delimited JSON reading and writing.

use std::fs;

use advisor_synth::dataset::{
    read_instructions, read_jsonl, write_jsonl, InstructionRecord, JsonlAppender, RecordSink,
};

#[test]
fn read_instructions_reports_bad_lines_with_line_numbers() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("instructions.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"instruction\":\"34-year-old professional\",\"context\":\"\",\"response\":\"\"}\n",
            "not json\n",
            "\n",
            "{\"instruction\":\"   \"}\n",
            "{\"context\":\"missing instruction\"}\n",
            "{\"instruction\":\"52-year-old business owner\"}\n",
        ),
    )
    .expect("should write fixture");

    let outcome = read_instructions(&path).expect("should read");
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[1].instruction, "52-year-old business owner");
    let lines: Vec<usize> = outcome.skipped.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![2, 4, 5]);
    assert_eq!(outcome.skipped[1].reason, "empty instruction");
}

#[test]
fn write_jsonl_truncates_previous_content() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("out.jsonl");
    fs::write(&path, "stale line\nstale line\nstale line\n").expect("should write fixture");

    let records = vec![InstructionRecord::new("a"), InstructionRecord::new("b")];
    let written = write_jsonl(&path, &records).expect("should write");
    assert_eq!(written, 2);

    let contents = fs::read_to_string(&path).expect("should read back");
    assert_eq!(contents.lines().count(), 2);
    assert!(!contents.contains("stale"));
}

#[test]
fn appender_keeps_existing_lines_and_adds_one_per_record() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("training.jsonl");
    fs::write(&path, "{\"instruction\":\"earlier\",\"context\":\"\",\"response\":\"done\"}\n")
        .expect("should write fixture");

    let mut appender = JsonlAppender::open(&path).expect("should open");
    appender
        .write(&InstructionRecord::new("new").with_response("draft"))
        .expect("should append");
    // Visible immediately, before the appender is dropped.
    let outcome = read_jsonl::<InstructionRecord>(&path).expect("should read");
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[1].response, "draft");
    assert!(outcome.skipped.is_empty());
    assert_eq!(appender.path(), path.as_path());
}

#[test]
fn missing_file_is_an_io_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("absent.jsonl");
    let err = match read_instructions(&path) {
        Ok(_) => panic!("missing file should fail"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("absent.jsonl"));
}
