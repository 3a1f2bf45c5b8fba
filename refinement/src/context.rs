//! Context composition for agent invocations.
//!
//! Every invocation context is built from the same two or three sections,
//! in fixed order, with fixed bracketed headers. The history section is
//! omitted entirely when the rendered view is empty; an empty `[HISTORY]`
//! header is never emitted.

/// Header for the rendered-history section.
pub const HISTORY_HEADER: &str = "[HISTORY]";
/// Header for the role-specific instruction section.
pub const USER_PROMPT_HEADER: &str = "[USER PROMPT]";
/// Header for the original topic, used only by the convergence step.
pub const INITIAL_PROMPT_HEADER: &str = "[USER INITIAL PROMPT]";

/// Compose a round or asking context: optional history, then the task.
pub fn compose(history_text: &str, task: &str) -> String {
    if history_text.is_empty() {
        format!("{}\n{}", USER_PROMPT_HEADER, task)
    } else {
        format!(
            "{}\n{}\n\n{}\n{}",
            HISTORY_HEADER, history_text, USER_PROMPT_HEADER, task
        )
    }
}

/// Compose a convergence context: the original topic, then the track's
/// history, then the final-directive task.
pub fn compose_final(topic: &str, history_text: &str, task: &str) -> String {
    format!(
        "{}\n{}\n\n{}",
        INITIAL_PROMPT_HEADER,
        topic,
        compose(history_text, task)
    )
}
