//! advisor-synth CLI entry point.
//!
//! Provides `instructions`, `generate`, `score`, and `analyze` subcommands for
//! synthesizing advisor briefs, drafting responses through an LLM provider,
//! scoring the drafts, and inspecting the resulting dataset.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use advisor_synth::analysis::{analyze_file, render_sample};
use advisor_synth::config::{resolve_config, Config};
use advisor_synth::credentials::load_credentials;
use advisor_synth::dataset::{
    read_instructions, read_jsonl, write_jsonl, InstructionRecord, JsonlAppender, ReadOutcome,
};
use advisor_synth::driver::{GenerationDriver, GenerationSettings};
use advisor_synth::judge::{sorted_path, DatasetEntry, Judge, JudgeSettings};
use advisor_synth::logging;
use advisor_synth::prompts::load_system_prompt;
use advisor_synth::providers::select::{build_provider, ProviderKind, ProviderSpec};
use advisor_synth::synth::{Brief, DuplicatePolicy, Synthesizer};

/// advisor-synth: build fine-tuning datasets of advisor briefs and drafted
/// client communications.
#[derive(Parser)]
#[command(name = "advisor-synth", version, about)]
struct Cli {
    /// Config file. Defaults to ./advisor-synth.toml, then
    /// ~/.advisor-synth/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory, rotated daily.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Synthesize advisor briefs into an instruction file.
    Instructions(InstructionsArgs),
    /// Draft a client communication for every instruction.
    Generate(GenerateArgs),
    /// Score a generated dataset with an LLM judge.
    Score(ScoreArgs),
    /// Print dataset statistics or a single record.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct InstructionsArgs {
    /// Number of briefs to produce.
    #[arg(long)]
    count: Option<usize>,
    /// Sampling seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Output file.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Keep or reject duplicate briefs.
    #[arg(long, value_enum)]
    dedup: Option<DuplicatePolicy>,
    /// Print this many sampled briefs instead of writing a file.
    #[arg(long, value_name = "K")]
    preview: Option<usize>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Instruction file to read.
    #[arg(long)]
    instructions: Option<PathBuf>,
    /// Dataset file to append to.
    #[arg(long)]
    output: Option<PathBuf>,
    /// LLM provider.
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,
    /// Model identifier.
    #[arg(long)]
    model: Option<String>,
    /// Draft one response for the first instruction and print it.
    #[arg(long)]
    preview: bool,
    /// Only process the first N instructions.
    #[arg(long, value_name = "N")]
    max_samples: Option<usize>,
    /// Minimum seconds between provider calls.
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,
    /// API key, taking precedence over the environment.
    #[arg(long)]
    api_key: Option<String>,
    /// Retries per record for transient failures.
    #[arg(long)]
    max_retries: Option<u32>,
    /// File replacing the built-in system prompt.
    #[arg(long, value_name = "FILE")]
    system_prompt: Option<PathBuf>,
}

#[derive(Args)]
struct ScoreArgs {
    /// Dataset to score.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Scored dataset output.
    #[arg(long)]
    output: Option<PathBuf>,
    /// LLM provider for the judge.
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,
    /// Judge model identifier.
    #[arg(long)]
    model: Option<String>,
    /// Only score the first N records.
    #[arg(long, value_name = "N")]
    max_samples: Option<usize>,
    /// API key, taking precedence over the environment.
    #[arg(long)]
    api_key: Option<String>,
    /// Minimum seconds between judge calls.
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Dataset file.
    file: PathBuf,
    /// Print the record at this 0-based index instead of statistics.
    #[arg(long, value_name = "INDEX")]
    sample: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logging_guard = match &cli.log_dir {
        Some(dir) => Some(logging::init_with_file(dir)?),
        None => {
            logging::init_cli();
            None
        }
    };

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Instructions(args) => handle_instructions(config, args),
        Command::Generate(args) => handle_generate(config, args).await,
        Command::Score(args) => handle_score(config, args).await,
        Command::Analyze(args) => handle_analyze(&args),
    }
}

/// A provider switched on the command line drops a model configured for the
/// other provider.
fn select_provider(
    current: &mut ProviderKind,
    model: &mut Option<String>,
    provider: Option<ProviderKind>,
    model_override: Option<String>,
) {
    if let Some(kind) = provider {
        if kind != *current && model_override.is_none() {
            *model = None;
        }
        *current = kind;
    }
    if model_override.is_some() {
        *model = model_override;
    }
}

fn handle_instructions(mut config: Config, args: InstructionsArgs) -> anyhow::Result<()> {
    let synthesis = &mut config.synthesis;
    if let Some(count) = args.count {
        synthesis.count = count;
    }
    if let Some(seed) = args.seed {
        synthesis.seed = seed;
    }
    if let Some(output) = args.output {
        synthesis.output = output;
    }
    if let Some(dedup) = args.dedup {
        synthesis.dedup = dedup;
    }
    let config = config;

    let synthesizer = Synthesizer::from_config(&config.synthesis)?;

    if let Some(k) = args.preview {
        let briefs = synthesizer.generate(k, config.synthesis.seed)?;
        for (i, brief) in briefs.iter().enumerate() {
            println!(
                "{}. [{} / {}]\n   {}\n",
                i.saturating_add(1),
                brief.persona,
                brief.category,
                brief.instruction
            );
        }
        return Ok(());
    }

    let briefs = synthesizer.generate(config.synthesis.count, config.synthesis.seed)?;
    let records: Vec<InstructionRecord> = briefs.into_iter().map(Brief::into_record).collect();
    let output = &config.synthesis.output;
    let written = write_jsonl(output, &records)?;

    info!(written, output = %output.display(), seed = config.synthesis.seed, "instructions written");
    println!("Wrote {written} instructions to {}", output.display());
    Ok(())
}

async fn handle_generate(mut config: Config, args: GenerateArgs) -> anyhow::Result<()> {
    let generation = &mut config.generation;
    select_provider(
        &mut generation.provider,
        &mut generation.model,
        args.provider,
        args.model,
    );
    if let Some(path) = args.instructions {
        generation.instructions = path;
    }
    if let Some(path) = args.output {
        generation.output = path;
    }
    if let Some(delay) = args.delay {
        generation.delay_secs = delay;
    }
    if let Some(path) = args.system_prompt {
        generation.system_prompt_path = Some(path);
    }
    if let Some(max_retries) = args.max_retries {
        config.retry.max_retries = max_retries;
    }
    config.validate()?;
    let config = config;
    let generation = &config.generation;

    let system_prompt = load_system_prompt(generation.system_prompt_path.as_deref())?;
    let credentials = load_credentials(Some(&config.providers.env_file))?;
    let provider = build_provider(
        &ProviderSpec {
            kind: generation.provider,
            model: generation.model(),
            timeout: generation.timeout(),
            api_key_override: args.api_key.as_deref(),
        },
        &config.providers,
        &credentials,
    )?;

    let ReadOutcome { records, skipped } = read_instructions(&generation.instructions)?;
    for line in &skipped {
        warn!(line = line.line, reason = %line.reason, "skipping malformed instruction");
    }
    if records.is_empty() {
        anyhow::bail!(
            "no usable instructions in {}",
            generation.instructions.display()
        );
    }

    let driver = GenerationDriver::new(
        provider,
        GenerationSettings {
            system_prompt,
            max_tokens: generation.max_tokens,
            delay: generation.delay(),
            max_samples: args.max_samples,
            retry: config.retry.policy(),
        },
    );

    if args.preview {
        let record = driver.preview(&records).await?;
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let mut sink = JsonlAppender::open(&generation.output)?;
    let summary = driver.run(&records, &mut sink).await?;

    println!(
        "Attempted {}, wrote {} to {}, failed {}",
        summary.attempted,
        summary.written,
        sink.path().display(),
        summary.failed.len()
    );
    if summary.written == 0 && summary.attempted > 0 {
        anyhow::bail!("every record failed; see the log for provider errors");
    }
    Ok(())
}

async fn handle_score(mut config: Config, args: ScoreArgs) -> anyhow::Result<()> {
    let judge_config = &mut config.judge;
    select_provider(
        &mut judge_config.provider,
        &mut judge_config.model,
        args.provider,
        args.model,
    );
    if let Some(path) = args.input {
        judge_config.input = path;
    }
    if let Some(path) = args.output {
        judge_config.output = path;
    }
    if let Some(delay) = args.delay {
        judge_config.delay_secs = delay;
    }
    config.validate()?;
    let config = config;
    let judge_config = &config.judge;

    let credentials = load_credentials(Some(&config.providers.env_file))?;
    let provider = build_provider(
        &ProviderSpec {
            kind: judge_config.provider,
            model: judge_config.model(),
            timeout: config.generation.timeout(),
            api_key_override: args.api_key.as_deref(),
        },
        &config.providers,
        &credentials,
    )?;

    let ReadOutcome { records, skipped } =
        read_jsonl::<DatasetEntry>(&judge_config.input)?;
    for line in &skipped {
        warn!(line = line.line, reason = %line.reason, "skipping malformed record");
    }

    let judge = Judge::new(
        provider,
        JudgeSettings {
            max_tokens: judge_config.max_tokens,
            delay: judge_config.delay(),
            max_samples: args.max_samples,
            retry: config.retry.policy(),
        },
    );
    let summary = judge.score_dataset(&records, &judge_config.output).await?;

    println!("{summary}");
    println!(
        "Scored dataset: {}\nSorted by score: {}",
        judge_config.output.display(),
        sorted_path(&judge_config.output).display()
    );
    Ok(())
}

fn handle_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    if let Some(index) = args.sample {
        let ReadOutcome { records, .. } = read_jsonl::<InstructionRecord>(&args.file)?;
        let text = render_sample(&records, index)
            .with_context(|| format!("cannot show sample from {}", args.file.display()))?;
        println!("{text}");
        return Ok(());
    }

    let report = analyze_file(&args.file)?;
    let rule = "=".repeat(80);
    println!("{rule}\nDATASET ANALYSIS: {}\n{rule}\n", args.file.display());
    println!("{report}");
    Ok(())
}
