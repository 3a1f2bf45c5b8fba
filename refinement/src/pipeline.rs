//! Pipeline configuration: role-instruction tables, entry-variant
//! selection, and validated run inputs.
//!
//! A pipeline variant is configuration, not code. Both variants run the
//! same round machine; they differ only in the instruction table and in
//! how round 1 is entered (bare topic versus pre-split sub-topics).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error for run inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// The topic text was empty or whitespace.
    #[error("topic text must be non-empty")]
    EmptyTopic,
    /// The requested round count was zero.
    #[error("round count must be at least 1")]
    NoRounds,
}

/// Role-instruction table for one pipeline variant.
///
/// System instructions define each role; task bodies are the
/// `[USER PROMPT]` sections composed with rendered history.
#[derive(Debug, Clone, Copy)]
pub struct PromptSet {
    /// System instruction for the primary style agent.
    pub style_system: &'static str,
    /// System instruction for the primary object agent.
    pub object_system: &'static str,
    /// System instruction for the style asking agent.
    pub style_ask_system: &'static str,
    /// System instruction for the object asking agent.
    pub object_ask_system: &'static str,
    /// Task body for the style primary in rounds 2 and later.
    pub style_revise_task: &'static str,
    /// Task body for the object primary in rounds 2 and later.
    pub object_revise_task: &'static str,
    /// Task body for every style asking invocation.
    pub style_ask_task: &'static str,
    /// Task body for every object asking invocation.
    pub object_ask_task: &'static str,
    /// System instruction for the final style directive writer.
    pub final_style_system: &'static str,
    /// System instruction for the final object directive writer.
    pub final_object_system: &'static str,
    /// Task body for the final style invocation.
    pub final_style_task: &'static str,
    /// Task body for the final object invocation.
    pub final_object_task: &'static str,
}

/// One-shot topic-splitter instructions for the classifier entry.
#[derive(Debug, Clone, Copy)]
pub struct TopicSplitters {
    /// Extracts the style-relevant sub-topic from the raw topic.
    pub style: &'static str,
    /// Extracts the object-relevant sub-topic from the raw topic.
    pub object: &'static str,
}

/// A pipeline variant: instruction table plus optional classifier entry.
///
/// With `splitters` present, the run opens with one splitter invocation
/// per track against the bare topic, round 1 feeds each primary its own
/// sub-topic, and round 1 has no asking turn. With `splitters` absent,
/// round 1 feeds both primaries the bare topic and runs the asking turn.
/// Rounds 2 and later are identical across variants.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub prompts: PromptSet,
    pub splitters: Option<TopicSplitters>,
}

impl PipelineConfig {
    /// Variant name used in logs and the run summary.
    pub fn variant_name(&self) -> &'static str {
        if self.splitters.is_some() {
            "classifier"
        } else {
            "classic"
        }
    }
}

/// The run topic, immutable apart from the classifier entry's one-time
/// split into per-track sub-topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_focus: Option<String>,
}

impl Topic {
    pub fn new(text: &str) -> Result<Self, ParamsError> {
        if text.trim().is_empty() {
            return Err(ParamsError::EmptyTopic);
        }
        Ok(Self {
            text: text.to_string(),
            style_focus: None,
            object_focus: None,
        })
    }

    /// The full topic text as given by the caller.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fix the per-track sub-topics produced by the classifier split.
    /// First split wins: the sub-topics are immutable for the rest of
    /// the run, so later calls are ignored.
    pub fn split(&mut self, style_focus: &str, object_focus: &str) {
        if self.style_focus.is_some() {
            return;
        }
        self.style_focus = Some(style_focus.to_string());
        self.object_focus = Some(object_focus.to_string());
    }

    /// Round-1 entry text for the style track. Falls back to the full
    /// topic when no split occurred.
    pub fn style_focus(&self) -> &str {
        self.style_focus.as_deref().unwrap_or(&self.text)
    }

    /// Round-1 entry text for the object track.
    pub fn object_focus(&self) -> &str {
        self.object_focus.as_deref().unwrap_or(&self.text)
    }

    pub fn is_split(&self) -> bool {
        self.style_focus.is_some()
    }
}

/// Validated run inputs: topic, fixed round count, output location.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub topic: Topic,
    pub rounds: u32,
    pub outdir: PathBuf,
}

impl RunParams {
    pub fn new(topic: Topic, rounds: u32, outdir: impl Into<PathBuf>) -> Result<Self, ParamsError> {
        if rounds == 0 {
            return Err(ParamsError::NoRounds);
        }
        Ok(Self {
            topic,
            rounds,
            outdir: outdir.into(),
        })
    }
}
