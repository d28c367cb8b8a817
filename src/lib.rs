//! advisor-synth: synthetic advisor-brief and client-communication datasets.
//!
//! Two stages feed a fine-tuning dataset. The [`synth`] module expands a
//! persona and scenario catalog into advisor briefs; the [`driver`] asks an
//! LLM provider to draft one client communication per brief. [`judge`] and
//! [`analysis`] inspect the result.
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod dataset;
pub mod logging;
pub mod prompts;
pub mod providers;

pub mod retry;
pub mod throttle;

pub mod driver;
pub mod synth;

pub mod analysis;
pub mod judge;
