//! Scored natural-language summaries of GitHub repositories and their recent commits.
//!
//! The pipeline is: [`llm::prompt_builder::build`] renders a kind-specific prompt,
//! a [`llm::GenerationClient`] produces raw text, [`scoring::score`] rates it and
//! [`summary::assemble`] packs the result. [`summarizer::Summarizer`] drives those
//! steps and tracks per-repository status in a [`tasks::TaskTracker`].

pub mod aggregate;
pub mod cli_args;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod setup;
pub mod summarizer;
pub mod summary;
pub mod tasks;

pub use error::{ErrorKind, GenerationError, SummarizeError};
pub use models::{CommitRecord, RepositorySnapshot, ScoredSummary, SummaryKind};
pub use summarizer::{Summarizer, SummaryOutcome};
