//! Instruction synthesizer.
//!
//! Expands the persona catalog and scenario patterns into advisor briefs.
//! Sampling is driven by a seeded [`StdRng`], so the same configuration and
//! seed always produce the same sequence.

use std::collections::HashSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::dataset::InstructionRecord;

pub mod catalog;
pub mod templates;

use catalog::{find_persona, Persona, PERSONAS, PRODUCT_CATEGORIES};
use templates::{render, BriefParams, ScenarioCategory};

/// Sampling attempts allowed per requested brief under [`DuplicatePolicy::Reject`].
const MAX_ATTEMPTS_PER_BRIEF: usize = 50;

/// What to do with a brief identical to one already produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep duplicates.
    #[default]
    Allow,
    /// Resample until the brief is new.
    Reject,
}

/// Synthesizer construction and sampling errors.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Configuration enabled no personas.
    #[error("no personas enabled")]
    NoPersonas,
    /// A configured persona name is not in the catalog.
    #[error("unknown persona '{0}'")]
    UnknownPersona(String),
    /// A weight table cannot be sampled from.
    #[error("invalid {table} weights: {reason}")]
    InvalidWeights {
        /// Which table.
        table: &'static str,
        /// Why sampling is impossible.
        reason: String,
    },
    /// Could not find enough distinct briefs.
    #[error("only {produced} distinct briefs found after {attempts} attempts, {requested} requested")]
    DuplicatesExhausted {
        /// Distinct briefs produced.
        produced: usize,
        /// Briefs requested.
        requested: usize,
        /// Sampling attempts made.
        attempts: usize,
    },
}

/// One synthesized brief with the choices that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brief {
    /// Persona the values were drawn from.
    pub persona: &'static str,
    /// Scenario category used.
    pub category: ScenarioCategory,
    /// Rendered instruction text.
    pub instruction: String,
}

impl Brief {
    /// Convert into a dataset record with empty context and response.
    pub fn into_record(self) -> InstructionRecord {
        InstructionRecord::new(self.instruction)
    }
}

/// Samples briefs from an immutable persona and scenario table.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    personas: Vec<&'static Persona>,
    persona_weights: WeightedIndex<f64>,
    category_weights: WeightedIndex<f64>,
    dedup: DuplicatePolicy,
}

impl Synthesizer {
    /// Build a synthesizer from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError`] when no persona is enabled, a persona name is
    /// unknown, or a weight table sums to zero.
    pub fn from_config(config: &SynthesisConfig) -> Result<Self, SynthError> {
        let personas: Vec<&'static Persona> = if config.personas.is_empty() {
            PERSONAS.iter().collect()
        } else {
            config
                .personas
                .iter()
                .map(|name| find_persona(name).ok_or_else(|| SynthError::UnknownPersona(name.clone())))
                .collect::<Result<_, _>>()?
        };
        if personas.is_empty() {
            return Err(SynthError::NoPersonas);
        }
        if let Some(unknown) = config
            .persona_weights
            .keys()
            .find(|name| find_persona(name).is_none())
        {
            return Err(SynthError::UnknownPersona(unknown.clone()));
        }

        let persona_weights = WeightedIndex::new(
            personas
                .iter()
                .map(|p| config.persona_weights.get(p.name).copied().unwrap_or(1.0)),
        )
        .map_err(|e| SynthError::InvalidWeights {
            table: "persona",
            reason: e.to_string(),
        })?;

        let category_weights = WeightedIndex::new(
            ScenarioCategory::ALL
                .iter()
                .map(|c| config.scenario_weights.get(c).copied().unwrap_or(1.0)),
        )
        .map_err(|e| SynthError::InvalidWeights {
            table: "scenario",
            reason: e.to_string(),
        })?;

        debug!(
            personas = personas.len(),
            dedup = ?config.dedup,
            "synthesizer configured"
        );

        Ok(Self {
            personas,
            persona_weights,
            category_weights,
            dedup: config.dedup,
        })
    }

    /// Sample one brief.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Brief {
        let persona = self.personas[self.persona_weights.sample(rng)];
        let category = ScenarioCategory::ALL[self.category_weights.sample(rng)];
        let params = sample_params(persona, rng);
        let pattern = category
            .patterns()
            .choose(rng)
            .copied()
            .unwrap_or_default();
        Brief {
            persona: persona.name,
            category,
            instruction: render(pattern, &params),
        }
    }

    /// Produce exactly `count` briefs from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::DuplicatesExhausted`] when duplicates are
    /// rejected and not enough distinct briefs turn up.
    pub fn generate(&self, count: usize, seed: u64) -> Result<Vec<Brief>, SynthError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut briefs = Vec::with_capacity(count);

        match self.dedup {
            DuplicatePolicy::Allow => {
                briefs.extend((0..count).map(|_| self.sample(&mut rng)));
            }
            DuplicatePolicy::Reject => {
                let budget = count.saturating_mul(MAX_ATTEMPTS_PER_BRIEF);
                let mut seen = HashSet::with_capacity(count);
                let mut attempts = 0_usize;
                while briefs.len() < count {
                    if attempts >= budget {
                        return Err(SynthError::DuplicatesExhausted {
                            produced: briefs.len(),
                            requested: count,
                            attempts,
                        });
                    }
                    attempts = attempts.saturating_add(1);
                    let brief = self.sample(&mut rng);
                    if seen.insert(brief.instruction.clone()) {
                        briefs.push(brief);
                    }
                }
                debug!(attempts, count, "distinct briefs sampled");
            }
        }

        info!(count = briefs.len(), seed, "briefs synthesized");
        Ok(briefs)
    }
}

fn sample_params<R: Rng + ?Sized>(persona: &Persona, rng: &mut R) -> BriefParams {
    let age = rng.gen_range(persona.age_range.0..=persona.age_range.1);
    let income = round_thousand(rng.gen_range(persona.income_range.0..=persona.income_range.1));
    let assets = round_thousand(rng.gen_range(persona.asset_range.0..=persona.asset_range.1));
    let debt = round_thousand(rng.gen_range(0..=income));
    let family = pick(persona.families, rng);
    let goal = pick(persona.goals, rng);
    let challenge = pick(persona.challenges, rng);
    let product = PRODUCT_CATEGORIES
        .choose(rng)
        .map(|c| pick(c.products, rng))
        .unwrap_or_default();

    BriefParams {
        age,
        income,
        assets,
        debt,
        family,
        goal,
        challenge,
        product,
    }
}

fn pick<R: Rng + ?Sized>(items: &'static [&'static str], rng: &mut R) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

fn round_thousand(value: u64) -> u64 {
    (value.saturating_add(500) / 1_000).saturating_mul(1_000)
}
