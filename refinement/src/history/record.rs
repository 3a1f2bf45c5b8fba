//! Round records — the append-only unit of refinement history.

use serde::{Deserialize, Serialize};

/// Which refinement track a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Painting style: form, palette, technique, expression.
    Style,
    /// Objects and motifs: what the image depicts.
    Object,
}

impl Track {
    /// Label used in rendered history for this track's primary response.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Style => "STYLE",
            Self::Object => "OBJECT",
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// One track's contribution to one round.
///
/// A record is built provisionally with only the primary response (that
/// form is what the asking agent gets to see), then finalized with the
/// ask response before it is committed. Committed records are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number.
    pub round: u32,
    /// Which track produced this record.
    pub track: Track,
    /// The primary agent's response for this round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_response: Option<String>,
    /// The asking agent's questions. Absent on provisional records and in
    /// round 1 of the classifier pipeline, which has no asking turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_response: Option<String>,
    /// True when every populated response field parsed as a JSON object.
    /// Observational only; the text is stored verbatim either way.
    pub structured: bool,
}

impl RoundRecord {
    /// A provisional record carrying only the primary response.
    pub fn provisional(round: u32, track: Track, role_response: &str, structured: bool) -> Self {
        Self {
            round,
            track,
            role_response: Some(role_response.to_string()),
            ask_response: None,
            structured,
        }
    }

    /// Finalize with the asking agent's response.
    pub fn with_ask(mut self, ask_response: &str, ask_structured: bool) -> Self {
        self.ask_response = Some(ask_response.to_string());
        self.structured = self.structured && ask_structured;
        self
    }
}

/// Whether a raw agent response is structured output: a single JSON object.
///
/// Anything else (arrays, scalars, prose, JSON with trailing prose) counts
/// as freeform. Freeform output is kept verbatim; callers only log it.
pub fn output_is_structured(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text.trim()),
        Ok(serde_json::Value::Object(_))
    )
}
