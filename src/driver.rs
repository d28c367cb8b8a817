//! Response generation driver.
//!
//! Walks instruction records in order, asks the provider for one drafted
//! client communication per record, and hands each completed record to a
//! [`RecordSink`] before moving on. Calls are strictly sequential; the
//! [`Throttle`] spaces them and [`call_with_retry`] absorbs transient
//! failures. A record that still fails is reported and skipped.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dataset::{DatasetError, InstructionRecord, RecordSink};
use crate::providers::{LlmProvider, ProviderError};
use crate::retry::{call_with_retry, RetryPolicy};
use crate::throttle::Throttle;

/// Characters of an instruction shown in progress logs.
const LOG_PREVIEW_CHARS: usize = 80;

/// Immutable settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// System prompt sent with every request.
    pub system_prompt: String,
    /// Completion token budget per response.
    pub max_tokens: u32,
    /// Minimum spacing between provider calls.
    pub delay: Duration,
    /// Only the first `n` records are processed when set.
    pub max_samples: Option<usize>,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

/// A record the driver gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// 0-based position in the processed input.
    pub index: usize,
    /// Final error, rendered.
    pub error: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records a call was attempted for.
    pub attempted: usize,
    /// Records written to the sink.
    pub written: usize,
    /// Records skipped after failing.
    pub failed: Vec<RecordFailure>,
}

/// Driver errors outside per-record failures.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// There is nothing to preview.
    #[error("no instruction records to process")]
    NoRecords,
    /// The preview call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Apply the `max_samples` cap: the first `n` records, in order.
pub fn cap_records<T>(records: &[T], max_samples: Option<usize>) -> &[T] {
    match max_samples {
        Some(n) => &records[..n.min(records.len())],
        None => records,
    }
}

/// Fills `response` for instruction records through one provider.
pub struct GenerationDriver {
    provider: Arc<dyn LlmProvider>,
    settings: GenerationSettings,
}

impl GenerationDriver {
    /// Create a driver over `provider`.
    pub fn new(provider: Arc<dyn LlmProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Draft the response for one record, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the final [`ProviderError`] if every attempt fails.
    pub async fn draft(
        &self,
        record: &InstructionRecord,
        label: usize,
    ) -> Result<InstructionRecord, ProviderError> {
        let response = call_with_retry(&self.settings.retry, label, || {
            self.provider.complete_text(
                &self.settings.system_prompt,
                &record.instruction,
                self.settings.max_tokens,
            )
        })
        .await?;
        Ok(record.with_response(response))
    }

    /// Draft exactly one response, for the first record, without persisting it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NoRecords`] for empty input, or the provider
    /// error if the call fails.
    pub async fn preview(
        &self,
        records: &[InstructionRecord],
    ) -> Result<InstructionRecord, DriverError> {
        let first = records.first().ok_or(DriverError::NoRecords)?;
        info!(model = %self.provider.model_id(), "drafting preview sample");
        Ok(self.draft(first, 1).await?)
    }

    /// Process records in order, writing each success to `sink` immediately.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] only when the sink fails; provider failures
    /// are recorded in the summary and do not stop the run.
    pub async fn run<S: RecordSink>(
        &self,
        records: &[InstructionRecord],
        sink: &mut S,
    ) -> Result<RunSummary, DatasetError> {
        let selected = cap_records(records, self.settings.max_samples);
        let total = selected.len();
        let mut throttle = Throttle::new(self.settings.delay);
        let mut summary = RunSummary::default();

        info!(
            total,
            model = %self.provider.model_id(),
            delay_ms = u64::try_from(self.settings.delay.as_millis()).unwrap_or(u64::MAX),
            "generation started"
        );

        for (index, record) in selected.iter().enumerate() {
            let position = index.saturating_add(1);
            throttle.acquire().await;
            summary.attempted = summary.attempted.saturating_add(1);
            info!(
                position,
                total,
                instruction = %preview_text(&record.instruction),
                "drafting response"
            );

            match self.draft(record, position).await {
                Ok(filled) => {
                    sink.write(&filled)?;
                    summary.written = summary.written.saturating_add(1);
                    debug!(position, chars = filled.response.chars().count(), "response written");
                }
                Err(e) => {
                    warn!(position, total, error = %e, "skipping record after provider failure");
                    summary.failed.push(RecordFailure {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            attempted = summary.attempted,
            written = summary.written,
            failed = summary.failed.len(),
            "generation finished"
        );
        Ok(summary)
    }
}

fn preview_text(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
