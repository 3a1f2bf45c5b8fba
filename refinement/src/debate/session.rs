//! Run session state machine.
//!
//! A run walks `Init → Round(1) → … → Round(N) → Finalize → Done` with no
//! other edges: rounds advance by exactly one, finalize is reachable only
//! from the last planned round, and `Done` is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Session created; no invocation issued yet.
    Init,
    /// Executing the numbered round (1-based).
    Round(u32),
    /// All rounds committed; convergence invocations in progress.
    Finalize,
    /// Terminal: both artifacts written.
    Done,
}

impl RunPhase {
    /// Whether this phase ends the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether `to` is a legal successor, given the planned round count.
    pub fn can_transition(self, to: RunPhase, rounds_planned: u32) -> bool {
        match (self, to) {
            (Self::Init, Self::Round(1)) => true,
            (Self::Round(r), Self::Round(next)) => next == r + 1 && next <= rounds_planned,
            (Self::Round(r), Self::Finalize) => r == rounds_planned,
            (Self::Finalize, Self::Done) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Round(r) => write!(f, "round_{}", r),
            Self::Finalize => write!(f, "finalize"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Error from an invalid phase transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: RunPhase,
    pub to: RunPhase,
    pub reason: String,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} -> {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for TransitionError {}

/// Live state of one refinement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSession {
    /// Unique run id.
    pub run_id: String,
    /// Current phase.
    pub phase: RunPhase,
    /// Fixed number of rounds this run executes.
    pub rounds_planned: u32,
    /// UTC creation time.
    pub started_at: DateTime<Utc>,
}

impl RunSession {
    pub fn new(rounds_planned: u32) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            phase: RunPhase::Init,
            rounds_planned,
            started_at: Utc::now(),
        }
    }

    /// Move to `to`, rejecting anything outside the legal successor set.
    pub fn transition(&mut self, to: RunPhase) -> Result<(), TransitionError> {
        if !self.phase.can_transition(to, self.rounds_planned) {
            let reason = if self.phase.is_terminal() {
                "session is terminal".to_string()
            } else {
                format!("not a legal successor with {} planned rounds", self.rounds_planned)
            };
            return Err(TransitionError {
                from: self.phase,
                to,
                reason,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// Compact one-line status for logs.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] {} rounds planned | run={}",
            self.phase, self.rounds_planned, self.run_id
        )
    }
}
