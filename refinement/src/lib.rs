//! Round-Based Multi-Agent Refinement Library
//!
//! This library provides:
//! - An agent invocation port abstracting the generative backend
//! - Append-only, role-partitioned history with rendered views
//! - Deterministic context composition for every agent invocation
//! - A round controller driving the style/object refinement loop
//! - Convergence into two final tagged directives (style, object)
//! - Run persistence: history snapshots, final artifacts, run summary
//!
//! # Usage
//!
//! ```ignore
//! let pipeline = PipelineConfig { prompts, splitters: None };
//! let params = RunParams::new(Topic::new("Fauvism, a fox")?, 3, "runs")?;
//! let controller = RoundController::new(&backend, pipeline, params)?;
//! let outcome = controller.run().await?;
//! println!("{}", outcome.summary_line());
//! ```

#![allow(dead_code)]
#![allow(clippy::uninlined_format_args)]

pub mod agent;
pub mod context;
pub mod debate;
pub mod history;
pub mod persistence;
pub mod pipeline;

// Re-export key agent port types
pub use agent::{AgentError, AgentPort, AgentRole};

// Re-export key history types
pub use history::{render_history, HistoryError, HistoryStore, RoundRecord, Track};

// Re-export key pipeline types
pub use pipeline::{ParamsError, PipelineConfig, PromptSet, RunParams, Topic, TopicSplitters};

// Re-export key debate types
pub use debate::{
    RoundController, RunError, RunOutcome, RunPhase, RunSession, TransitionError,
};

// Re-export key persistence types
pub use persistence::{PersistenceError, RunPersister, RunSummary};
