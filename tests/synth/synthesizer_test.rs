//! Instruction synthesizer properties.

use std::collections::{BTreeMap, HashSet};

use advisor_synth::config::SynthesisConfig;
use advisor_synth::synth::templates::ScenarioCategory;
use advisor_synth::synth::{Brief, DuplicatePolicy, SynthError, Synthesizer};

fn synthesizer(config: &SynthesisConfig) -> Synthesizer {
    match Synthesizer::from_config(config) {
        Ok(synth) => synth,
        Err(err) => panic!("synthesizer should build: {err}"),
    }
}

fn generate(config: &SynthesisConfig, count: usize, seed: u64) -> Vec<Brief> {
    match synthesizer(config).generate(count, seed) {
        Ok(briefs) => briefs,
        Err(err) => panic!("generation should succeed: {err}"),
    }
}

#[test]
fn produces_exactly_the_requested_count() {
    let config = SynthesisConfig::default();
    for count in [0, 1, 37, 250] {
        assert_eq!(generate(&config, count, 42).len(), count);
    }
}

#[test]
fn records_have_instruction_and_empty_context_and_response() {
    for brief in generate(&SynthesisConfig::default(), 100, 42) {
        let record = brief.into_record();
        assert!(!record.instruction.trim().is_empty());
        assert!(record.context.is_empty());
        assert!(record.response.is_empty());
    }
}

#[test]
fn rendered_briefs_have_no_leftover_placeholders() {
    for brief in generate(&SynthesisConfig::default(), 300, 9) {
        assert!(
            !brief.instruction.contains('{') && !brief.instruction.contains('}'),
            "unfilled placeholder in: {}",
            brief.instruction
        );
    }
}

#[test]
fn same_seed_gives_identical_sequence() {
    let config = SynthesisConfig::default();
    let first = generate(&config, 60, 42);
    let second = generate(&config, 60, 42);
    assert_eq!(first, second);
}

#[test]
fn different_seeds_give_different_sequences() {
    let config = SynthesisConfig::default();
    assert_ne!(generate(&config, 30, 1), generate(&config, 30, 2));
}

#[test]
fn reject_policy_yields_distinct_instructions() {
    let config = SynthesisConfig {
        dedup: DuplicatePolicy::Reject,
        ..SynthesisConfig::default()
    };
    let briefs = generate(&config, 200, 42);
    let distinct: HashSet<&str> = briefs.iter().map(|b| b.instruction.as_str()).collect();
    assert_eq!(distinct.len(), 200);
}

#[test]
fn enabled_personas_restrict_sampling() {
    let config = SynthesisConfig {
        personas: vec!["Entrepreneur".to_owned()],
        ..SynthesisConfig::default()
    };
    assert!(generate(&config, 50, 3)
        .iter()
        .all(|b| b.persona == "Entrepreneur"));
}

#[test]
fn zero_weights_exclude_categories() {
    let mut scenario_weights = BTreeMap::new();
    for category in ScenarioCategory::ALL {
        scenario_weights.insert(category, 0.0);
    }
    scenario_weights.insert(ScenarioCategory::Market, 1.0);
    let config = SynthesisConfig {
        scenario_weights,
        ..SynthesisConfig::default()
    };
    assert!(generate(&config, 50, 5)
        .iter()
        .all(|b| b.category == ScenarioCategory::Market));
}

#[test]
fn unknown_persona_is_rejected() {
    let config = SynthesisConfig {
        personas: vec!["Crypto Whale".to_owned()],
        ..SynthesisConfig::default()
    };
    match Synthesizer::from_config(&config) {
        Err(SynthError::UnknownPersona(name)) => assert_eq!(name, "Crypto Whale"),
        Err(other) => panic!("expected unknown persona, got: {other}"),
        Ok(_) => panic!("unknown persona should be rejected"),
    }
}

#[test]
fn all_zero_persona_weights_are_rejected() {
    let persona_weights = advisor_synth::synth::catalog::PERSONAS
        .iter()
        .map(|p| (p.name.to_owned(), 0.0))
        .collect();
    let config = SynthesisConfig {
        persona_weights,
        ..SynthesisConfig::default()
    };
    assert!(matches!(
        Synthesizer::from_config(&config),
        Err(SynthError::InvalidWeights { table: "persona", .. })
    ));
}
