//! Round controller — drives a full refinement run.
//!
//! Entry (optional topic split) → rounds 1..N → convergence. Every agent
//! invocation is awaited to completion before the next begins, and every
//! round record is committed to the store and rewritten to disk before
//! the following invocation. Any failure aborts the run and leaves the
//! store at its last persisted state.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::agent::{AgentError, AgentPort, AgentRole};
use crate::context::compose;
use crate::debate::convergence::converge_track;
use crate::debate::session::{RunPhase, RunSession, TransitionError};
use crate::history::{
    output_is_structured, render_history, HistoryError, HistoryStore, RoundRecord, Track,
};
use crate::persistence::{PersistenceError, RunPersister, RunSummary};
use crate::pipeline::{PipelineConfig, RunParams, Topic};

/// Error that aborts a refinement run.
///
/// There is no recoverable class: no retry, no backoff, no fallback.
/// Already-committed rounds remain valid on disk.
#[derive(Debug)]
pub enum RunError {
    /// An agent invocation failed.
    Invocation { role: AgentRole, source: AgentError },
    /// A record could not be appended.
    History(HistoryError),
    /// Durable state could not be written.
    Persistence(PersistenceError),
    /// The session refused a phase transition.
    Transition(TransitionError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invocation { role, source } => {
                write!(f, "invocation failed for {} agent: {}", role, source)
            }
            Self::History(e) => write!(f, "history append failed: {}", e),
            Self::Persistence(e) => write!(f, "persistence failed: {}", e),
            Self::Transition(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {}

/// Result of a completed refinement run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Final style directive, verbatim.
    pub style_directive: String,
    /// Final object directive, verbatim.
    pub object_directive: String,
    /// Rounds executed.
    pub rounds_completed: u32,
    /// Directory holding the histories, artifacts, and summary.
    pub run_dir: std::path::PathBuf,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

impl RunOutcome {
    /// Compact one-line summary for logs.
    pub fn summary_line(&self) -> String {
        format!(
            "[done] {} rounds | {} ms | artifacts in {}",
            self.rounds_completed,
            self.elapsed_ms,
            self.run_dir.display()
        )
    }
}

/// Drives one refinement run end to end.
///
/// Usage:
/// 1. Build a `PipelineConfig` (classic or classifier instruction table).
/// 2. Validate inputs into `RunParams`.
/// 3. `RoundController::new(&port, pipeline, params)?` creates the run
///    directory and a fresh session.
/// 4. `controller.run().await?` executes entry, every round, and the
///    convergence step, returning the two directives.
pub struct RoundController<'a> {
    port: &'a dyn AgentPort,
    pipeline: PipelineConfig,
    topic: Topic,
    session: RunSession,
    store: HistoryStore,
    persister: RunPersister,
}

impl<'a> RoundController<'a> {
    pub fn new(
        port: &'a dyn AgentPort,
        pipeline: PipelineConfig,
        params: RunParams,
    ) -> Result<Self, RunError> {
        let persister = RunPersister::create(&params.outdir).map_err(RunError::Persistence)?;
        Ok(Self {
            port,
            pipeline,
            topic: params.topic,
            session: RunSession::new(params.rounds),
            store: HistoryStore::new(),
            persister,
        })
    }

    /// The directory this run writes into.
    pub fn run_dir(&self) -> &Path {
        self.persister.run_dir()
    }

    /// The session state machine (phase, run id, planned rounds).
    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// The in-memory history committed so far.
    pub fn history(&self) -> &HistoryStore {
        &self.store
    }

    /// Execute the whole run.
    pub async fn run(&mut self) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        info!(
            run_id = %self.session.run_id,
            variant = self.pipeline.variant_name(),
            rounds = self.session.rounds_planned,
            topic = self.topic.text(),
            "refinement run started"
        );

        self.run_entry().await?;

        for round in 1..=self.session.rounds_planned {
            self.session
                .transition(RunPhase::Round(round))
                .map_err(RunError::Transition)?;
            info!(round, "round started");
            self.run_track(round, Track::Style).await?;
            self.run_track(round, Track::Object).await?;
            info!(round, "round finished");
        }

        self.session
            .transition(RunPhase::Finalize)
            .map_err(RunError::Transition)?;
        info!("convergence started");

        let style_directive = converge_track(
            self.port,
            &self.pipeline.prompts,
            self.topic.text(),
            &self.store,
            Track::Style,
        )
        .await
        .map_err(|e| RunError::Invocation {
            role: AgentRole::FinalStyle,
            source: e,
        })?;
        self.persister
            .write_artifact(Track::Style, &style_directive)
            .map_err(RunError::Persistence)?;

        let object_directive = converge_track(
            self.port,
            &self.pipeline.prompts,
            self.topic.text(),
            &self.store,
            Track::Object,
        )
        .await
        .map_err(|e| RunError::Invocation {
            role: AgentRole::FinalObject,
            source: e,
        })?;
        self.persister
            .write_artifact(Track::Object, &object_directive)
            .map_err(RunError::Persistence)?;

        self.session
            .transition(RunPhase::Done)
            .map_err(RunError::Transition)?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let summary = RunSummary {
            run_id: self.session.run_id.clone(),
            topic: self.topic.text().to_string(),
            variant: self.pipeline.variant_name().to_string(),
            rounds: self.session.rounds_planned,
            started_at: self.session.started_at,
            elapsed_ms,
        };
        self.persister
            .write_summary(&summary)
            .map_err(RunError::Persistence)?;

        info!(run_id = %self.session.run_id, elapsed_ms, "refinement run finished");

        Ok(RunOutcome {
            style_directive,
            object_directive,
            rounds_completed: self.session.rounds_planned,
            run_dir: self.persister.run_dir().to_path_buf(),
            elapsed_ms,
        })
    }

    /// Run entry. Classifier pipelines open with one splitter invocation
    /// per track, fixing the sub-topics on the topic; classic pipelines
    /// skip straight to round 1. The topic snapshot is written either way.
    async fn run_entry(&mut self) -> Result<(), RunError> {
        if let Some(splitters) = self.pipeline.splitters {
            info!("topic split started");
            let style_focus = self
                .invoke_raw(AgentRole::StyleSplitter, splitters.style, self.topic.text())
                .await?;
            let object_focus = self
                .invoke_raw(AgentRole::ObjectSplitter, splitters.object, self.topic.text())
                .await?;
            self.topic.split(&style_focus, &object_focus);
            info!(
                style_focus = %style_focus,
                object_focus = %object_focus,
                "topic split finished"
            );
        }
        self.persister
            .write_topic(&self.topic)
            .map_err(RunError::Persistence)
    }

    /// One track's turn within one round.
    ///
    /// Composes for the primary, invokes it, composes for the asking
    /// agent against the not-yet-committed provisional record, invokes
    /// it, then commits the finalized record and rewrites the history
    /// files. Round 1 feeds the primary its topic focus instead of
    /// history, and skips the asking turn under the classifier entry.
    async fn run_track(&mut self, round: u32, track: Track) -> Result<(), RunError> {
        let prompts = self.pipeline.prompts;
        let classifier_entry = self.pipeline.splitters.is_some();
        let (primary_role, primary_system, revise_task, ask_role, ask_system, ask_task) =
            match track {
                Track::Style => (
                    AgentRole::Style,
                    prompts.style_system,
                    prompts.style_revise_task,
                    AgentRole::StyleAsk,
                    prompts.style_ask_system,
                    prompts.style_ask_task,
                ),
                Track::Object => (
                    AgentRole::Object,
                    prompts.object_system,
                    prompts.object_revise_task,
                    AgentRole::ObjectAsk,
                    prompts.object_ask_system,
                    prompts.object_ask_task,
                ),
            };

        info!(round, track = %track, "primary agent start");
        let primary_context = if round == 1 {
            let focus = match track {
                Track::Style => self.topic.style_focus(),
                Track::Object => self.topic.object_focus(),
            };
            compose("", focus)
        } else {
            compose(&render_history(self.store.unified()), revise_task)
        };
        let (role_response, structured) = self
            .invoke_classified(primary_role, round, primary_system, &primary_context)
            .await?;
        let provisional = RoundRecord::provisional(round, track, &role_response, structured);

        let record = if round == 1 && classifier_entry {
            // The split already interrogated the topic; round 1 commits
            // the primary response alone.
            provisional
        } else {
            // The asking agent reacts to the response just produced,
            // before that response is durably appended. Round 1
            // interrogates the provisional record alone; later rounds
            // see the full unified history plus it.
            let ask_context = if round == 1 {
                compose(&render_history(std::slice::from_ref(&provisional)), ask_task)
            } else {
                let mut view = self.store.unified().to_vec();
                view.push(provisional.clone());
                compose(&render_history(&view), ask_task)
            };
            info!(round, track = %track, "asking agent start");
            let (ask_response, ask_structured) = self
                .invoke_classified(ask_role, round, ask_system, &ask_context)
                .await?;
            provisional.with_ask(&ask_response, ask_structured)
        };

        self.store.append(record).map_err(RunError::History)?;
        self.persister
            .write_history(&self.store)
            .map_err(RunError::Persistence)?;
        info!(round, track = %track, "record committed");
        Ok(())
    }

    async fn invoke_raw(
        &self,
        role: AgentRole,
        instruction: &str,
        context: &str,
    ) -> Result<String, RunError> {
        self.port
            .invoke(instruction, context)
            .await
            .map_err(|e| RunError::Invocation { role, source: e })
    }

    /// Invoke a record-bound role and classify the reply's shape. The
    /// text is kept verbatim whatever the shape; freeform output is only
    /// flagged and logged.
    async fn invoke_classified(
        &self,
        role: AgentRole,
        round: u32,
        instruction: &str,
        context: &str,
    ) -> Result<(String, bool), RunError> {
        let text = self.invoke_raw(role, instruction, context).await?;
        let structured = output_is_structured(&text);
        if !structured {
            warn!(role = %role, round, "freeform agent output, storing verbatim");
        }
        Ok((text, structured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_display() {
        let err = RunError::Invocation {
            role: AgentRole::Style,
            source: AgentError::EmptyResponse,
        };
        let msg = err.to_string();
        assert!(msg.contains("style agent"));
        assert!(msg.contains("empty"));

        let err = RunError::History(HistoryError::NonMonotonicRound {
            track: Track::Style,
            round: 1,
            last: 2,
        });
        assert!(err.to_string().contains("history append failed"));

        let err = RunError::Transition(TransitionError {
            from: RunPhase::Done,
            to: RunPhase::Finalize,
            reason: "session is terminal".to_string(),
        });
        assert!(err.to_string().contains("invalid transition"));
    }

    #[test]
    fn test_outcome_summary_line() {
        let outcome = RunOutcome {
            style_directive: "STYLE: x END_OF_PROMPT".to_string(),
            object_directive: "OBJECTS: y END_OF_PROMPT".to_string(),
            rounds_completed: 3,
            run_dir: std::path::PathBuf::from("runs/20250907/101500"),
            elapsed_ms: 42,
        };
        let line = outcome.summary_line();
        assert!(line.starts_with("[done]"));
        assert!(line.contains("3 rounds"));
        assert!(line.contains("42 ms"));
        assert!(line.contains("20250907"));
    }
}
