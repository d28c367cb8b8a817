//! Configuration loading and validation.
//!
//! A single optional TOML file configures both stages. Every section and key
//! has a default, so an absent file is equivalent to an empty one. Command
//! line flags are applied on top once, before the value is handed to the
//! synthesizer or the driver; nothing mutates it afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::providers::anthropic::ANTHROPIC_API_BASE;
use crate::providers::openai::OPENAI_API_BASE;
use crate::providers::select::ProviderKind;
use crate::retry::RetryPolicy;
use crate::synth::catalog::find_persona;
use crate::synth::templates::ScenarioCategory;
use crate::synth::DuplicatePolicy;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "advisor-synth.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Instruction synthesis settings.
    pub synthesis: SynthesisConfig,
    /// Response generation settings.
    pub generation: GenerationConfig,
    /// Retry policy for provider calls.
    pub retry: RetryConfig,
    /// Quality judge settings.
    pub judge: JudgeConfig,
    /// Provider endpoints and credential file.
    pub providers: ProvidersConfig,
}

/// Instruction synthesizer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Number of briefs to produce.
    pub count: usize,
    /// Seed for reproducible sampling.
    pub seed: u64,
    /// Whether exact-duplicate briefs are kept.
    pub dedup: DuplicatePolicy,
    /// Enabled persona names. Empty means every persona in the catalog.
    pub personas: Vec<String>,
    /// Relative persona weights by name. Missing personas weigh 1.0.
    pub persona_weights: BTreeMap<String, f64>,
    /// Relative scenario weights. Missing categories weigh 1.0.
    pub scenario_weights: BTreeMap<ScenarioCategory, f64>,
    /// Where synthesized instructions are written.
    pub output: PathBuf,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            dedup: DuplicatePolicy::default(),
            personas: Vec::new(),
            persona_weights: BTreeMap::new(),
            scenario_weights: BTreeMap::new(),
            output: PathBuf::from("instructions.jsonl"),
        }
    }
}

/// Response generation driver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Provider used to draft responses.
    pub provider: ProviderKind,
    /// Model identifier. Defaults per provider when unset.
    pub model: Option<String>,
    /// Minimum seconds between consecutive provider calls.
    pub delay_secs: f64,
    /// Completion token budget per response.
    pub max_tokens: u32,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
    /// Input instruction file.
    pub instructions: PathBuf,
    /// Output dataset file (appended to).
    pub output: PathBuf,
    /// Optional file replacing the built-in system prompt.
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: None,
            delay_secs: 1.0,
            max_tokens: 2000,
            timeout_secs: 120,
            instructions: PathBuf::from("instructions.jsonl"),
            output: PathBuf::from("training_data_full.jsonl"),
            system_prompt_path: None,
        }
    }
}

impl GenerationConfig {
    /// Configured model, or the provider default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Inter-call delay. Validation guarantees it converts; an unvalidated
    /// out-of-range value means no delay.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry policy for transient provider failures.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Backoff before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound for the exponential backoff, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// Convert into the runtime policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// LLM-as-judge scoring settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JudgeConfig {
    /// Provider used for scoring.
    pub provider: ProviderKind,
    /// Model identifier. Defaults per provider when unset.
    pub model: Option<String>,
    /// Completion token budget per evaluation.
    pub max_tokens: u32,
    /// Minimum seconds between consecutive judge calls.
    pub delay_secs: f64,
    /// Dataset to score.
    pub input: PathBuf,
    /// Scored dataset output.
    pub output: PathBuf,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: None,
            max_tokens: 1000,
            delay_secs: 0.0,
            input: PathBuf::from("training_data_full.jsonl"),
            output: PathBuf::from("training_data_scored.jsonl"),
        }
    }
}

impl JudgeConfig {
    /// Configured model, or the provider default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Inter-call delay.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }
}

/// Provider endpoints and credential source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Anthropic messages endpoint.
    pub anthropic_base_url: String,
    /// OpenAI chat completions endpoint.
    pub openai_base_url: String,
    /// Optional `.env` file with API keys. The environment takes precedence.
    pub env_file: PathBuf,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            anthropic_base_url: ANTHROPIC_API_BASE.to_owned(),
            openai_base_url: OPENAI_API_BASE.to_owned(),
            env_file: PathBuf::from(".env"),
        }
    }
}

impl Config {
    /// Reject values that would only fail later, mid-run.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid key.
    pub fn validate(&self) -> anyhow::Result<()> {
        check_delay("generation.delay_secs", self.generation.delay_secs)?;
        check_delay("judge.delay_secs", self.judge.delay_secs)?;
        if self.generation.max_tokens == 0 {
            anyhow::bail!("generation.max_tokens must be greater than zero");
        }
        if self.judge.max_tokens == 0 {
            anyhow::bail!("judge.max_tokens must be greater than zero");
        }
        if self.generation.timeout_secs == 0 {
            anyhow::bail!("generation.timeout_secs must be greater than zero");
        }
        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            anyhow::bail!("retry.max_backoff_ms must not be below retry.initial_backoff_ms");
        }
        for name in self
            .synthesis
            .personas
            .iter()
            .chain(self.synthesis.persona_weights.keys())
        {
            if find_persona(name).is_none() {
                anyhow::bail!("unknown persona '{name}' in [synthesis]");
            }
        }
        for (name, weight) in &self.synthesis.persona_weights {
            check_weight(&format!("synthesis.persona_weights.{name}"), *weight)?;
        }
        for (category, weight) in &self.synthesis.scenario_weights {
            check_weight(&format!("synthesis.scenario_weights.{category}"), *weight)?;
        }
        Ok(())
    }
}

fn check_delay(key: &str, value: f64) -> anyhow::Result<()> {
    if Duration::try_from_secs_f64(value).is_err() {
        anyhow::bail!("{key} must be a non-negative number of seconds, got {value}");
    }
    Ok(())
}

fn check_weight(key: &str, value: f64) -> anyhow::Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{key} must be a non-negative weight, got {value}");
    }
    Ok(())
}

/// Load and validate a config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Locate and load the configuration.
///
/// An explicit path must exist. Otherwise `./advisor-synth.toml` and then
/// `~/.advisor-synth/config.toml` are tried, falling back to defaults.
///
/// # Errors
///
/// Returns an error if a located file is invalid.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Ok(dir) = config_dir() {
        candidates.push(dir.join("config.toml"));
    }

    for candidate in candidates {
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "loading config");
            return load_config(&candidate);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Resolve the per-user config directory (`~/.advisor-synth/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".advisor-synth"))
}
