//! LLM-backed agents for the atelier prompt-refinement loop.
//!
//! This crate supplies everything the `refinement` core treats as
//! external: the production role instructions for both pipeline
//! variants, an OpenAI-compatible chat backend implementing the agent
//! port, and its configuration surface.

pub mod backend;
pub mod config;
pub mod prompts;

pub use backend::ChatBackend;
pub use config::{BackendConfig, ConfigError};
pub use prompts::{classic_pipeline, classifier_pipeline, PROMPT_VERSION};
