//! Dataset statistics and record inspection.

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::dataset::{read_jsonl, DatasetError, InstructionRecord, ReadOutcome};
use crate::synth::templates::format_money;

const AGE_PATTERN: &str = r"(\d+)(?:-year-old| years old)";
const MONEY_PATTERN: &str = r"\$(\d+(?:,\d+)*)";

/// First dollar amounts inside this open range are read as annual income.
const INCOME_BOUNDS: (u64, u64) = (10_000, 500_000);

/// Response markers left by failed or stubbed generation.
const PLACEHOLDER_MARKERS: [&str; 2] = ["[Error generating response", "[This would be generated"];

/// Counted keywords: label and the substrings that count towards it.
const KEYWORDS: [(&str, &[&str]); 7] = [
    ("retirement", &["retirement"]),
    ("savings", &["savings"]),
    // "invest" already matches every "investment".
    ("investment", &["invest"]),
    ("debt", &["debt"]),
    ("education", &["college", "education"]),
    ("mortgage", &["mortgage"]),
    ("insurance", &["insurance"]),
];

/// Character-length statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthStats {
    /// Mean length.
    pub mean: f64,
    /// Shortest.
    pub min: usize,
    /// Longest.
    pub max: usize,
}

impl LengthStats {
    fn from_lengths(lengths: &[usize]) -> Option<Self> {
        let min = *lengths.iter().min()?;
        let max = *lengths.iter().max()?;
        let sum = lengths.iter().fold(0_u64, |acc, n| {
            acc.saturating_add(u64::try_from(*n).unwrap_or(u64::MAX))
        });
        Some(Self {
            mean: mean(sum, lengths.len()),
            min,
            max,
        })
    }
}

/// Statistics over numbers extracted from instructions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    /// How many values were found.
    pub count: usize,
    /// Smallest value.
    pub min: u64,
    /// Largest value.
    pub max: u64,
    /// Mean value.
    pub mean: f64,
}

impl ValueStats {
    fn from_values(values: &[u64]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let sum = values.iter().fold(0_u64, |acc, v| acc.saturating_add(*v));
        Some(Self {
            count: values.len(),
            min,
            max,
            mean: mean(sum, values.len()),
        })
    }
}

#[allow(clippy::cast_precision_loss)] // dataset sizes are far below 2^52
fn mean(sum: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// Summary of one dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    /// Records parsed.
    pub records: usize,
    /// Lines that were not valid records.
    pub skipped_lines: usize,
    /// File size in bytes.
    pub file_size: u64,
    /// Instruction lengths, if any records.
    pub instruction_lengths: Option<LengthStats>,
    /// Response lengths, if any records.
    pub response_lengths: Option<LengthStats>,
    /// Records with non-blank context.
    pub with_context: usize,
    /// Ages mentioned in instructions.
    pub ages: Option<ValueStats>,
    /// First plausible income figure per instruction.
    pub incomes: Option<ValueStats>,
    /// Responses carrying a placeholder or error marker.
    pub placeholder_responses: usize,
    /// Non-zero keyword counts, most frequent first.
    pub keywords: Vec<(&'static str, usize)>,
}

/// Compute statistics for `records`.
pub fn analyze(records: &[InstructionRecord], file_size: u64) -> DatasetReport {
    let instruction_lengths: Vec<usize> = records
        .iter()
        .map(|r| r.instruction.chars().count())
        .collect();
    let response_lengths: Vec<usize> = records
        .iter()
        .map(|r| r.response.chars().count())
        .collect();

    let mut ages = Vec::new();
    if let Ok(regex) = Regex::new(AGE_PATTERN) {
        for record in records {
            ages.extend(
                regex
                    .captures_iter(&record.instruction)
                    .filter_map(|c| c.get(1)?.as_str().parse::<u64>().ok()),
            );
        }
    }

    let mut incomes = Vec::new();
    if let Ok(regex) = Regex::new(MONEY_PATTERN) {
        for record in records {
            let first = regex
                .captures(&record.instruction)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok());
            if let Some(amount) = first {
                if amount > INCOME_BOUNDS.0 && amount < INCOME_BOUNDS.1 {
                    incomes.push(amount);
                }
            }
        }
    }

    let placeholder_responses = records
        .iter()
        .filter(|r| PLACEHOLDER_MARKERS.iter().any(|m| r.response.contains(m)))
        .count();

    DatasetReport {
        records: records.len(),
        skipped_lines: 0,
        file_size,
        instruction_lengths: LengthStats::from_lengths(&instruction_lengths),
        response_lengths: LengthStats::from_lengths(&response_lengths),
        with_context: records
            .iter()
            .filter(|r| !r.context.trim().is_empty())
            .count(),
        ages: ValueStats::from_values(&ages),
        incomes: ValueStats::from_values(&incomes),
        placeholder_responses,
        keywords: keyword_counts(records),
    }
}

fn keyword_counts(records: &[InstructionRecord]) -> Vec<(&'static str, usize)> {
    let text = records
        .iter()
        .map(|r| r.instruction.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let mut counts: Vec<(&'static str, usize)> = KEYWORDS
        .iter()
        .map(|(label, needles)| {
            let n = needles
                .iter()
                .fold(0_usize, |acc, needle| acc.saturating_add(text.matches(needle).count()));
            (*label, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();
    // Stable sort keeps table order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Read `path` and compute its report.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be read.
pub fn analyze_file(path: &Path) -> Result<DatasetReport, DatasetError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| DatasetError::io("failed to stat", path, e))?
        .len();
    let ReadOutcome { records, skipped } = read_jsonl::<InstructionRecord>(path)?;
    for line in &skipped {
        tracing::warn!(line = line.line, reason = %line.reason, "skipping malformed record");
    }
    let mut report = analyze(&records, file_size);
    report.skipped_lines = skipped.len();
    Ok(report)
}

/// Requested sample index past the end of the dataset.
#[derive(Debug, thiserror::Error)]
#[error("index {index} out of range (dataset has {len} records)")]
pub struct SampleOutOfRange {
    /// Requested 0-based index.
    pub index: usize,
    /// Records available.
    pub len: usize,
}

/// Render the record at 0-based `index` for display.
///
/// # Errors
///
/// Returns [`SampleOutOfRange`] when `index` is past the end.
pub fn render_sample(
    records: &[InstructionRecord],
    index: usize,
) -> Result<String, SampleOutOfRange> {
    let record = records.get(index).ok_or(SampleOutOfRange {
        index,
        len: records.len(),
    })?;
    let context = if record.context.trim().is_empty() {
        "(empty)"
    } else {
        record.context.as_str()
    };
    let rule = "=".repeat(80);
    Ok(format!(
        "{rule}\nSAMPLE #{number}\n{rule}\n\nInstruction:\n{instruction}\n\nContext:\n{context}\n\nResponse:\n{response}\n\n{rule}",
        number = index.saturating_add(1),
        instruction = record.instruction,
        response = record.response,
    ))
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basic statistics")?;
        writeln!(f, "  Total records:   {}", self.records)?;
        if self.skipped_lines > 0 {
            writeln!(f, "  Skipped lines:   {}", self.skipped_lines)?;
        }
        #[allow(clippy::cast_precision_loss)]
        let kib = self.file_size as f64 / 1024.0;
        writeln!(f, "  File size:       {kib:.2} KB")?;

        for (title, stats) in [
            ("Instructions", self.instruction_lengths),
            ("Responses", self.response_lengths),
        ] {
            if let Some(stats) = stats {
                writeln!(f, "\n{title}")?;
                writeln!(f, "  Average length:  {:.0} characters", stats.mean)?;
                writeln!(f, "  Min length:      {} characters", stats.min)?;
                writeln!(f, "  Max length:      {} characters", stats.max)?;
            }
        }

        writeln!(f, "\nContext field")?;
        writeln!(f, "  With context:    {}", self.with_context)?;
        writeln!(
            f,
            "  Without context: {}",
            self.records.saturating_sub(self.with_context)
        )?;

        if let Some(ages) = self.ages {
            writeln!(f, "\nAges mentioned")?;
            writeln!(f, "  Mentions:        {}", ages.count)?;
            writeln!(f, "  Range:           {} - {}", ages.min, ages.max)?;
            writeln!(f, "  Average:         {:.1}", ages.mean)?;
        }

        if let Some(incomes) = self.incomes {
            writeln!(f, "\nIncome (first amount per instruction)")?;
            writeln!(f, "  Records:         {}", incomes.count)?;
            writeln!(f, "  Average:         ${:.0}", incomes.mean)?;
            writeln!(
                f,
                "  Range:           {} - {}",
                format_money(incomes.min),
                format_money(incomes.max)
            )?;
        }

        writeln!(f, "\nQuality check")?;
        if self.placeholder_responses == 0 {
            writeln!(f, "  No placeholder or error responses")?;
        } else {
            let complete = self.records.saturating_sub(self.placeholder_responses);
            writeln!(f, "  Placeholder responses: {}", self.placeholder_responses)?;
            writeln!(f, "  Complete responses:    {complete}")?;
            #[allow(clippy::cast_precision_loss)]
            let rate = complete as f64 / self.records.max(1) as f64 * 100.0;
            writeln!(f, "  Completion rate:       {rate:.1}%")?;
        }

        writeln!(f, "\nKeyword frequency")?;
        if self.keywords.is_empty() {
            write!(f, "  (none)")?;
        }
        for (i, (keyword, count)) in self.keywords.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {keyword}: {count}")?;
        }
        Ok(())
    }
}
