//! Convergence: one final invocation per track, producing the tagged
//! terminal directives consumed by the image-generation step.

use crate::agent::{AgentError, AgentPort};
use crate::context::compose_final;
use crate::history::{render_history, HistoryStore, Track};
use crate::pipeline::PromptSet;

/// Literal tag opening the style directive. Downstream contract.
pub const STYLE_TAG: &str = "STYLE:";
/// Literal tag opening the object directive. Downstream contract.
pub const OBJECT_TAG: &str = "OBJECTS:";
/// End-of-text sentinel closing both directives. Downstream contract.
pub const END_OF_PROMPT: &str = "END_OF_PROMPT";

/// Produce one track's final directive.
///
/// Renders that track's full view, composes it with the original topic
/// and the track's final task, and invokes the final writer once. The
/// reply is returned verbatim: the instructions ask the model to open
/// with the track tag and close with the sentinel, and nothing here
/// validates or repairs that (explicit trust boundary).
pub async fn converge_track(
    port: &dyn AgentPort,
    prompts: &PromptSet,
    topic_text: &str,
    store: &HistoryStore,
    track: Track,
) -> Result<String, AgentError> {
    let (system, task) = match track {
        Track::Style => (prompts.final_style_system, prompts.final_style_task),
        Track::Object => (prompts.final_object_system, prompts.final_object_task),
    };
    let history_text = render_history(store.track(track));
    let context = compose_final(topic_text, &history_text, task);
    port.invoke(system, &context).await
}
