//! Deterministic textual rendering of history views.
//!
//! Rendered history is fed back to agents as context in later rounds, so
//! the output must be byte-stable for a given sequence of records: one
//! labeled line per present field, the field text below it, one blank
//! line between records.

use super::record::RoundRecord;

/// Render a history view (unified or single-track) for agent context.
///
/// Each record contributes a `[Round r][STYLE]` or `[Round r][OBJECT]`
/// block when its primary response is present, then a `[Round r][ASK]`
/// block when its ask response is present. An empty view renders to the
/// empty string.
pub fn render_history(records: &[RoundRecord]) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(records.len());

    for record in records {
        let primary_label = format!("[Round {}][{}]", record.round, record.track.label());
        let ask_label = format!("[Round {}][ASK]", record.round);
        let mut lines: Vec<&str> = Vec::new();

        if let Some(text) = record.role_response.as_deref() {
            lines.push(&primary_label);
            lines.push(text);
        }
        if let Some(text) = record.ask_response.as_deref() {
            lines.push(&ask_label);
            lines.push(text);
        }
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    blocks.join("\n\n")
}
