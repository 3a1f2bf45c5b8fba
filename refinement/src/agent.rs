//! Agent invocation port — the single seam to the generative backend.
//!
//! Every agent in the refinement loop (primaries, ask counterparts, topic
//! splitters, convergence) is reached through one call shape: a role
//! instruction plus a composed context, answered with free text. Roles
//! select instructions, never backends; one backend serves a whole run.

use async_trait::async_trait;
use thiserror::Error;

/// Error raised by an agent backend.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The backend request failed (transport, HTTP status, or decode).
    #[error("backend request failed: {0}")]
    Backend(String),
    /// The backend answered, but the reply was empty once cleaned up.
    #[error("backend returned an empty response")]
    EmptyResponse,
}

/// The distinct roles an invocation can be made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    /// Primary style agent: maintains the structured style brief.
    Style,
    /// Primary object agent: maintains the object/motif inventory.
    Object,
    /// Interrogates the style track's latest output with targeted questions.
    StyleAsk,
    /// Interrogates the object track's latest output with targeted questions.
    ObjectAsk,
    /// One-shot topic splitter extracting the style-relevant sub-topic.
    StyleSplitter,
    /// One-shot topic splitter extracting the object-relevant sub-topic.
    ObjectSplitter,
    /// Convergence agent producing the final style directive.
    FinalStyle,
    /// Convergence agent producing the final object directive.
    FinalObject,
}

impl AgentRole {
    /// Human-readable description of what this role contributes.
    pub fn description(&self) -> &str {
        match self {
            Self::Style => "refines the style brief across rounds",
            Self::Object => "refines the object inventory across rounds",
            Self::StyleAsk => "raises clarifying questions on the style track",
            Self::ObjectAsk => "raises clarifying questions on the object track",
            Self::StyleSplitter => "extracts the style sub-topic from the raw topic",
            Self::ObjectSplitter => "extracts the object sub-topic from the raw topic",
            Self::FinalStyle => "converges the style track into one directive",
            Self::FinalObject => "converges the object track into one directive",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Object => write!(f, "object"),
            Self::StyleAsk => write!(f, "style_ask"),
            Self::ObjectAsk => write!(f, "object_ask"),
            Self::StyleSplitter => write!(f, "style_splitter"),
            Self::ObjectSplitter => write!(f, "object_splitter"),
            Self::FinalStyle => write!(f, "final_style"),
            Self::FinalObject => write!(f, "final_object"),
        }
    }
}

/// Port to the generative backend.
///
/// Implementations must be usable across await points; the controller
/// holds one instance for the whole run and awaits each invocation to
/// completion before issuing the next.
#[async_trait]
pub trait AgentPort: Send + Sync {
    /// Invoke the backend under `role_instruction` with a fully composed
    /// `context`, returning the agent's raw text reply.
    async fn invoke(&self, role_instruction: &str, context: &str) -> Result<String, AgentError>;
}
