//! Core pipeline orchestration and domain logic for component-relations.
//!
//! This crate ties together component discovery, usage indexing, story file
//! annotation, and JSON persistence into one run (see [`pipeline::run`]).

pub mod annotate;
pub mod index;
pub mod output;
pub mod pipeline;

pub use pipeline::{ProgressReporter, RunReport, SilentProgress, run};
