//! One-shot extraction of hot deals from an uploaded contract.
//!
//! - [`ExtractionOrchestrator`] - single inference request, then normalization
//! - [`DocumentStore`] / [`InferenceClient`] - the two outside collaborators
//! - [`ExtractionConfig`] - model, instructions and upload display name
//! - [`DEFAULT_INSTRUCTIONS`] - the hot-deal extraction prompt

pub mod collaborators;
pub mod config;
pub mod orchestrator;
pub mod prompt;

pub use collaborators::{DocumentHandle, DocumentStore, InferenceClient, InferenceRequest};
pub use config::{ExtractionConfig, DEFAULT_DISPLAY_NAME, PDF_MIME_TYPE};
pub use orchestrator::ExtractionOrchestrator;
pub use prompt::DEFAULT_INSTRUCTIONS;
