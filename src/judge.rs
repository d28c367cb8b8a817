//! LLM-as-judge quality scoring for generated datasets.
//!
//! Each record's instruction and drafted response are sent to a judge model
//! that replies with a JSON rubric. A reply that cannot be used still yields a
//! record, scored zero, so a scoring run never drops data.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::dataset::{write_jsonl, DatasetError, InstructionRecord};
use crate::driver::cap_records;
use crate::prompts::{judge_user_message, JUDGE_SYSTEM_PROMPT};
use crate::providers::LlmProvider;
use crate::retry::{call_with_retry, RetryPolicy};
use crate::throttle::Throttle;

/// Rubric scores for one record, each 1-10 (0 when scoring failed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// Overall quality.
    pub overall_score: f64,
    /// Confident, unhedged language.
    #[serde(default)]
    pub tone_confidence: f64,
    /// Partnership and ownership language.
    #[serde(default)]
    pub values_alignment: f64,
    /// Concrete, prioritized next steps.
    #[serde(default)]
    pub actionability: f64,
    /// Emotional acknowledgement.
    #[serde(default)]
    pub empathy_warmth: f64,
    /// Local products and regulation.
    #[serde(default)]
    pub market_specificity: f64,
    /// Fit to the client's wealth tier.
    #[serde(default)]
    pub tier_appropriateness: f64,
    /// Short overall assessment, or the failure reason.
    #[serde(default)]
    pub explanation: String,
    /// What the draft does well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What the draft should change.
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl QualityScores {
    /// All-zero scores carrying `explanation`.
    pub fn zero(explanation: impl Into<String>) -> Self {
        Self {
            overall_score: 0.0,
            tone_confidence: 0.0,
            values_alignment: 0.0,
            actionability: 0.0,
            empathy_warmth: 0.0,
            market_specificity: 0.0,
            tier_appropriateness: 0.0,
            explanation: explanation.into(),
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }
}

/// Key the judge writes its scores under.
const SCORES_KEY: &str = "quality_scores";

/// A dataset line to be scored, keeping any fields beyond the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// The instruction/response pair.
    #[serde(flatten)]
    pub record: InstructionRecord,
    /// Other fields on the line, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<InstructionRecord> for DatasetEntry {
    fn from(record: InstructionRecord) -> Self {
        Self {
            record,
            extra: Map::new(),
        }
    }
}

/// A dataset record with its scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// The original record, flattened into the same JSON object.
    #[serde(flatten)]
    pub record: InstructionRecord,
    /// Other fields from the input line.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Judge output.
    pub quality_scores: QualityScores,
}

/// The JSON payload of a judge reply, with any code fence removed.
pub fn extract_json_block(text: &str) -> &str {
    let Some((_, after_fence)) = text.split_once("```") else {
        return text.trim();
    };
    // Drop the language tag on the opening fence line, if any.
    let after_tag = after_fence.strip_prefix("json").unwrap_or(after_fence);
    let body = match after_tag.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('{') => rest,
        _ => after_tag,
    };
    body.split_once("```").map_or(body, |(json, _)| json).trim()
}

/// Parse a judge reply into scores.
///
/// # Errors
///
/// Returns the JSON error when the payload is not a valid rubric.
pub fn parse_scores(reply: &str) -> Result<QualityScores, serde_json::Error> {
    serde_json::from_str(extract_json_block(reply))
}

/// Aggregate statistics over overall scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSummary {
    /// Records scored.
    pub count: usize,
    /// Mean overall score.
    pub mean: f64,
    /// Highest overall score.
    pub max: f64,
    /// Lowest overall score.
    pub min: f64,
    /// Records scoring at least 8.0.
    pub at_least_8: usize,
    /// Records scoring at least 7.0.
    pub at_least_7: usize,
}

impl ScoreSummary {
    /// Summarize `scores`. Empty input gives an all-zero summary.
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let sum: f64 = scores.iter().sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / scores.len() as f64;
        Self {
            count: scores.len(),
            mean,
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            at_least_8: scores.iter().filter(|s| **s >= 8.0).count(),
            at_least_7: scores.iter().filter(|s| **s >= 7.0).count(),
        }
    }
}

impl std::fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Scored records:  {}", self.count)?;
        writeln!(f, "Average score:   {:.2}", self.mean)?;
        writeln!(f, "Highest score:   {:.2}", self.max)?;
        writeln!(f, "Lowest score:    {:.2}", self.min)?;
        writeln!(f, "Scores >= 8.0:   {}", self.at_least_8)?;
        write!(f, "Scores >= 7.0:   {}", self.at_least_7)
    }
}

/// `<stem>_sorted.jsonl` next to `output`.
pub fn sorted_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scored".to_owned());
    output.with_file_name(format!("{stem}_sorted.jsonl"))
}

/// Judge run settings.
#[derive(Debug, Clone)]
pub struct JudgeSettings {
    /// Completion token budget per evaluation.
    pub max_tokens: u32,
    /// Minimum spacing between judge calls.
    pub delay: Duration,
    /// Only the first `n` records are scored when set.
    pub max_samples: Option<usize>,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

/// Scores records through a judge model.
pub struct Judge {
    provider: Arc<dyn LlmProvider>,
    settings: JudgeSettings,
}

impl Judge {
    /// Create a judge over `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>, settings: JudgeSettings) -> Self {
        Self { provider, settings }
    }

    /// Score one record. Failures become zero scores, never errors.
    pub async fn score(&self, record: &InstructionRecord, label: usize) -> QualityScores {
        let message = judge_user_message(&record.instruction, &record.response);
        let reply = call_with_retry(&self.settings.retry, label, || {
            self.provider
                .complete_text(JUDGE_SYSTEM_PROMPT, &message, self.settings.max_tokens)
        })
        .await;

        let parsed = match reply {
            Ok(text) => parse_scores(&text).map_err(|e| format!("unparseable judge reply: {e}")),
            Err(e) => Err(e.to_string()),
        };
        parsed.unwrap_or_else(|reason| {
            warn!(position = label, error = %reason, "scoring failed, recording zero score");
            QualityScores::zero(format!("Error: {reason}"))
        })
    }

    /// Score every record, rewriting `output` after each one, then write
    /// the descending-score copy beside it.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if either output file cannot be written.
    pub async fn score_dataset(
        &self,
        entries: &[DatasetEntry],
        output: &Path,
    ) -> Result<ScoreSummary, DatasetError> {
        let selected = cap_records(entries, self.settings.max_samples);
        let total = selected.len();
        let mut throttle = Throttle::new(self.settings.delay);
        let mut scored: Vec<ScoredRecord> = Vec::with_capacity(total);

        info!(total, model = %self.provider.model_id(), "scoring started");

        for (index, entry) in selected.iter().enumerate() {
            let position = index.saturating_add(1);
            throttle.acquire().await;
            let quality_scores = self.score(&entry.record, position).await;
            info!(position, total, overall = quality_scores.overall_score, "record scored");
            let mut extra = entry.extra.clone();
            // Rescoring a scored file replaces the previous scores.
            extra.remove(SCORES_KEY);
            scored.push(ScoredRecord {
                record: entry.record.clone(),
                extra,
                quality_scores,
            });
            write_jsonl(output, &scored)?;
        }

        let overall: Vec<f64> = scored
            .iter()
            .map(|s| s.quality_scores.overall_score)
            .collect();
        let summary = ScoreSummary::from_scores(&overall);

        scored.sort_by(|a, b| {
            b.quality_scores
                .overall_score
                .total_cmp(&a.quality_scores.overall_score)
        });
        let sorted = sorted_path(output);
        write_jsonl(&sorted, &scored)?;

        info!(
            count = summary.count,
            mean = summary.mean,
            max = summary.max,
            min = summary.min,
            at_least_8 = summary.at_least_8,
            at_least_7 = summary.at_least_7,
            sorted = %sorted.display(),
            "scoring finished"
        );
        Ok(summary)
    }
}
