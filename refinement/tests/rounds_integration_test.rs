//! Scripted refinement-run integration test — exercises the full round
//! loop with a deterministic scripted backend (no LLM calls).
//!
//! Covers: controller ↔ history ↔ context composition ↔ convergence ↔
//! persistence running together, for both pipeline variants.

use std::fs;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use refinement::persistence::{
    HISTORY_FILE, HISTORY_OBJECT_FILE, HISTORY_STYLE_FILE, OBJECT_ARTIFACT_FILE,
    STYLE_ARTIFACT_FILE, SUMMARY_FILE, TOPIC_FILE,
};
use refinement::{
    AgentError, AgentPort, AgentRole, PipelineConfig, PromptSet, RoundController, RoundRecord,
    RunError, RunParams, RunPhase, RunSummary, Topic, TopicSplitters, Track,
};

const STYLE_SYS: &str = "style system";
const OBJECT_SYS: &str = "object system";
const STYLE_ASK_SYS: &str = "style ask system";
const OBJECT_ASK_SYS: &str = "object ask system";
const FINAL_STYLE_SYS: &str = "final style system";
const FINAL_OBJECT_SYS: &str = "final object system";
const SPLIT_STYLE_SYS: &str = "splitter style system";
const SPLIT_OBJECT_SYS: &str = "splitter object system";

fn prompt_set() -> PromptSet {
    PromptSet {
        style_system: STYLE_SYS,
        object_system: OBJECT_SYS,
        style_ask_system: STYLE_ASK_SYS,
        object_ask_system: OBJECT_ASK_SYS,
        style_revise_task: "revise the style brief",
        object_revise_task: "revise the object list",
        style_ask_task: "question the style brief",
        object_ask_task: "question the object list",
        final_style_system: FINAL_STYLE_SYS,
        final_object_system: FINAL_OBJECT_SYS,
        final_style_task: "write the final style line",
        final_object_task: "write the final object line",
    }
}

fn classic_pipeline() -> PipelineConfig {
    PipelineConfig {
        prompts: prompt_set(),
        splitters: None,
    }
}

fn classifier_pipeline() -> PipelineConfig {
    PipelineConfig {
        prompts: prompt_set(),
        splitters: Some(TopicSplitters {
            style: SPLIT_STYLE_SYS,
            object: SPLIT_OBJECT_SYS,
        }),
    }
}

fn params(rounds: u32, outdir: &TempDir) -> RunParams {
    RunParams::new(Topic::new("Fauvism, a fox").unwrap(), rounds, outdir.path()).unwrap()
}

/// One recorded invocation: role instruction plus composed context.
struct Call {
    instruction: String,
    context: String,
}

/// Scripted backend. Replies are keyed off the role instruction and the
/// per-instruction call ordinal, so every role and round stays
/// distinguishable; every call is recorded for context assertions.
struct ScriptedPort {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<(&'static str, usize)>,
    freeform: bool,
}

impl ScriptedPort {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            freeform: false,
        }
    }

    /// Fail the `on_call`-th invocation of the given instruction.
    fn failing(marker: &'static str, on_call: usize) -> Self {
        Self {
            fail_on: Some((marker, on_call)),
            ..Self::new()
        }
    }

    /// Answer record-bound roles with prose instead of JSON objects.
    fn freeform() -> Self {
        Self {
            freeform: true,
            ..Self::new()
        }
    }

    fn reply_for(&self, instruction: &str, ordinal: usize) -> String {
        if self.freeform
            && matches!(
                instruction,
                STYLE_SYS | OBJECT_SYS | STYLE_ASK_SYS | OBJECT_ASK_SYS
            )
        {
            return format!("freeform musing {}", ordinal);
        }
        match instruction {
            STYLE_SYS => format!("{{\"style_brief\": \"v{}\"}}", ordinal),
            OBJECT_SYS => format!("{{\"object_list\": \"v{}\"}}", ordinal),
            STYLE_ASK_SYS => format!("{{\"style_questions\": \"q{}\"}}", ordinal),
            OBJECT_ASK_SYS => format!("{{\"object_questions\": \"q{}\"}}", ordinal),
            FINAL_STYLE_SYS => {
                "STYLE: wild non-naturalistic color, flattened space. END_OF_PROMPT".to_string()
            }
            FINAL_OBJECT_SYS => "OBJECTS: a red fox. END_OF_PROMPT".to_string(),
            SPLIT_STYLE_SYS => "Fauvism".to_string(),
            SPLIT_OBJECT_SYS => "a fox".to_string(),
            other => format!("unscripted reply to {}", other),
        }
    }

    fn instructions(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.instruction.clone())
            .collect()
    }

    fn context_of(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index].context.clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentPort for ScriptedPort {
    async fn invoke(&self, role_instruction: &str, context: &str) -> Result<String, AgentError> {
        let mut calls = self.calls.lock().unwrap();
        let ordinal = calls
            .iter()
            .filter(|c| c.instruction == role_instruction)
            .count()
            + 1;
        calls.push(Call {
            instruction: role_instruction.to_string(),
            context: context.to_string(),
        });
        if let Some((marker, on_call)) = self.fail_on {
            if role_instruction == marker && ordinal == on_call {
                return Err(AgentError::Backend("scripted failure".to_string()));
            }
        }
        Ok(self.reply_for(role_instruction, ordinal))
    }
}

fn read_records(path: &std::path::Path) -> Vec<RoundRecord> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ── Single round, classic variant (happy path) ─────────────────────

#[tokio::test]
async fn test_single_round_classic_run() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::new();
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(1, &outdir)).unwrap();

    let outcome = controller.run().await.unwrap();

    assert_eq!(outcome.rounds_completed, 1);
    assert!(outcome.style_directive.starts_with("STYLE:"));
    assert!(outcome.style_directive.ends_with("END_OF_PROMPT"));
    assert!(outcome.object_directive.starts_with("OBJECTS:"));
    assert!(controller.session().phase.is_terminal());
    assert!(outcome.run_dir.starts_with(outdir.path()));

    // One style record, primary and ask both populated and structured.
    let style_records = controller.history().track(Track::Style);
    assert_eq!(style_records.len(), 1);
    assert_eq!(
        style_records[0].role_response.as_deref(),
        Some("{\"style_brief\": \"v1\"}")
    );
    assert_eq!(
        style_records[0].ask_response.as_deref(),
        Some("{\"style_questions\": \"q1\"}")
    );
    assert!(style_records[0].structured);

    // Exactly six invocations, in track order, asks after primaries.
    assert_eq!(
        port.instructions(),
        vec![
            STYLE_SYS,
            STYLE_ASK_SYS,
            OBJECT_SYS,
            OBJECT_ASK_SYS,
            FINAL_STYLE_SYS,
            FINAL_OBJECT_SYS,
        ]
    );

    // Round 1 primaries see the bare topic and no history or ask labels.
    assert_eq!(port.context_of(0), "[USER PROMPT]\nFauvism, a fox");
    assert_eq!(port.context_of(2), "[USER PROMPT]\nFauvism, a fox");

    // The asking agent reacts to the just-produced, not-yet-committed
    // primary response, and round 1 interrogates that record alone.
    let style_ask_context = port.context_of(1);
    assert!(style_ask_context.contains("[Round 1][STYLE]\n{\"style_brief\": \"v1\"}"));
    assert!(!style_ask_context.contains("[Round 1][OBJECT]"));
    let object_ask_context = port.context_of(3);
    assert!(object_ask_context.contains("[Round 1][OBJECT]\n{\"object_list\": \"v1\"}"));
    assert!(!object_ask_context.contains("[Round 1][STYLE]"));

    // Every run file is present; artifacts hold the directives verbatim.
    let run_dir = outcome.run_dir;
    for name in [
        HISTORY_FILE,
        HISTORY_STYLE_FILE,
        HISTORY_OBJECT_FILE,
        TOPIC_FILE,
        STYLE_ARTIFACT_FILE,
        OBJECT_ARTIFACT_FILE,
        SUMMARY_FILE,
    ] {
        assert!(run_dir.join(name).is_file(), "missing {}", name);
    }
    assert_eq!(
        fs::read_to_string(run_dir.join(STYLE_ARTIFACT_FILE)).unwrap(),
        outcome.style_directive
    );
    assert_eq!(
        fs::read_to_string(run_dir.join(OBJECT_ARTIFACT_FILE)).unwrap(),
        outcome.object_directive
    );
}

// ── Three rounds: record count and ordering ────────────────────────

#[tokio::test]
async fn test_three_round_ordering() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::new();
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(3, &outdir)).unwrap();

    let outcome = controller.run().await.unwrap();
    assert_eq!(outcome.rounds_completed, 3);

    let expected_order = [
        (1, Track::Style),
        (1, Track::Object),
        (2, Track::Style),
        (2, Track::Object),
        (3, Track::Style),
        (3, Track::Object),
    ];

    let unified = controller.history().unified();
    assert_eq!(unified.len(), 6);
    for (record, (round, track)) in unified.iter().zip(expected_order) {
        assert_eq!(record.round, round);
        assert_eq!(record.track, track);
    }

    let style_rounds: Vec<u32> = controller
        .history()
        .track(Track::Style)
        .iter()
        .map(|r| r.round)
        .collect();
    assert_eq!(style_rounds, vec![1, 2, 3]);

    // The persisted unified file mirrors the in-memory order.
    let on_disk = read_records(&outcome.run_dir.join(HISTORY_FILE));
    assert_eq!(on_disk.len(), 6);
    for (record, (round, track)) in on_disk.iter().zip(expected_order) {
        assert_eq!(record.round, round);
        assert_eq!(record.track, track);
    }
}

// ── Round 2 composition carries round 1, including its asks ────────

#[tokio::test]
async fn test_round_two_composition() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::new();
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(2, &outdir)).unwrap();
    controller.run().await.unwrap();

    // Call order: 4 round-1 calls, then style primary/ask and object
    // primary/ask for round 2, then the two finals.
    let round2_style_primary = port.context_of(4);
    assert!(round2_style_primary.starts_with("[HISTORY]\n"));
    assert!(round2_style_primary.contains("[Round 1][STYLE]"));
    assert!(round2_style_primary.contains("[Round 1][OBJECT]"));
    assert!(round2_style_primary.contains("[Round 1][ASK]"));
    assert!(round2_style_primary.ends_with("[USER PROMPT]\nrevise the style brief"));

    // The style ask sees the provisional round-2 response before commit.
    let round2_style_ask = port.context_of(5);
    assert!(round2_style_ask.contains("[Round 2][STYLE]\n{\"style_brief\": \"v2\"}"));

    // The object primary sees the committed round-2 style record.
    let round2_object_primary = port.context_of(6);
    assert!(round2_object_primary.contains("[Round 2][STYLE]"));
    assert!(round2_object_primary.contains("[Round 2][ASK]"));
    assert!(round2_object_primary.ends_with("[USER PROMPT]\nrevise the object list"));

    // And its ask sees the provisional round-2 object response.
    let round2_object_ask = port.context_of(7);
    assert!(round2_object_ask.contains("[Round 2][OBJECT]\n{\"object_list\": \"v2\"}"));
}

// ── Failure mid-run leaves committed rounds persisted ──────────────

#[tokio::test]
async fn test_round_two_failure_preserves_round_one() {
    let outdir = TempDir::new().unwrap();
    // Second style-primary invocation (round 2, step 2) fails.
    let port = ScriptedPort::failing(STYLE_SYS, 2);
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(3, &outdir)).unwrap();

    let err = controller.run().await.unwrap_err();
    assert!(matches!(
        err,
        RunError::Invocation {
            role: AgentRole::Style,
            ..
        }
    ));
    assert_eq!(controller.session().phase, RunPhase::Round(2));

    // Round 1 is intact in memory and on disk; no round-2 record exists.
    assert_eq!(controller.history().unified().len(), 2);
    let on_disk = read_records(&controller.run_dir().join(HISTORY_FILE));
    assert_eq!(on_disk.len(), 2);
    assert!(on_disk.iter().all(|r| r.round == 1));

    // No artifacts were written.
    assert!(!controller.run_dir().join(STYLE_ARTIFACT_FILE).exists());
    assert!(!controller.run_dir().join(OBJECT_ARTIFACT_FILE).exists());
}

// ── Commit granularity: persisted after every track turn ───────────

#[tokio::test]
async fn test_failure_mid_round_keeps_completed_track_turn() {
    let outdir = TempDir::new().unwrap();
    // Round 1's object ask fails, after the style record was committed.
    let port = ScriptedPort::failing(OBJECT_ASK_SYS, 1);
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(1, &outdir)).unwrap();

    let err = controller.run().await.unwrap_err();
    assert!(matches!(
        err,
        RunError::Invocation {
            role: AgentRole::ObjectAsk,
            ..
        }
    ));

    let unified = read_records(&controller.run_dir().join(HISTORY_FILE));
    assert_eq!(unified.len(), 1);
    assert_eq!(unified[0].track, Track::Style);
    assert_eq!(unified[0].round, 1);
    assert!(read_records(&controller.run_dir().join(HISTORY_OBJECT_FILE)).is_empty());
}

// ── Classifier variant: split entry, no round-1 asking turn ────────

#[tokio::test]
async fn test_classifier_entry() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::new();
    let mut controller =
        RoundController::new(&port, classifier_pipeline(), params(2, &outdir)).unwrap();

    let outcome = controller.run().await.unwrap();

    // Two splitters, four round-1/round-2 primaries, two round-2 asks,
    // two finals.
    assert_eq!(
        port.instructions(),
        vec![
            SPLIT_STYLE_SYS,
            SPLIT_OBJECT_SYS,
            STYLE_SYS,
            OBJECT_SYS,
            STYLE_SYS,
            STYLE_ASK_SYS,
            OBJECT_SYS,
            OBJECT_ASK_SYS,
            FINAL_STYLE_SYS,
            FINAL_OBJECT_SYS,
        ]
    );
    assert_eq!(port.call_count(), 10);

    // Splitters get the bare topic, unsectioned.
    assert_eq!(port.context_of(0), "Fauvism, a fox");
    assert_eq!(port.context_of(1), "Fauvism, a fox");

    // Round-1 primaries get their own sub-topic.
    assert_eq!(port.context_of(2), "[USER PROMPT]\nFauvism");
    assert_eq!(port.context_of(3), "[USER PROMPT]\na fox");

    // Round 1 committed without an asking turn; round 2 with one.
    let style_records = controller.history().track(Track::Style);
    assert_eq!(style_records.len(), 2);
    assert!(style_records[0].ask_response.is_none());
    assert!(style_records[1].ask_response.is_some());

    // The topic snapshot records the split.
    let topic: Topic =
        serde_json::from_str(&fs::read_to_string(outcome.run_dir.join(TOPIC_FILE)).unwrap())
            .unwrap();
    assert_eq!(topic.text(), "Fauvism, a fox");
    assert_eq!(topic.style_focus(), "Fauvism");
    assert_eq!(topic.object_focus(), "a fox");
}

// ── Freeform output is flagged, stored verbatim, never fatal ───────

#[tokio::test]
async fn test_freeform_output_flagged_not_fatal() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::freeform();
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(1, &outdir)).unwrap();

    controller.run().await.unwrap();

    let unified = controller.history().unified();
    assert_eq!(unified.len(), 2);
    for record in unified {
        assert!(!record.structured);
        assert!(record
            .role_response
            .as_deref()
            .unwrap()
            .starts_with("freeform musing"));
    }
}

// ── Run summary snapshot ───────────────────────────────────────────

#[tokio::test]
async fn test_run_summary_contents() {
    let outdir = TempDir::new().unwrap();
    let port = ScriptedPort::new();
    let mut controller =
        RoundController::new(&port, classic_pipeline(), params(1, &outdir)).unwrap();

    let outcome = controller.run().await.unwrap();

    let summary: RunSummary =
        serde_json::from_str(&fs::read_to_string(outcome.run_dir.join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary.run_id, controller.session().run_id);
    assert_eq!(summary.topic, "Fauvism, a fox");
    assert_eq!(summary.variant, "classic");
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.elapsed_ms, outcome.elapsed_ms);
}
