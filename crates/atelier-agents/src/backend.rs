//! OpenAI-compatible chat backend implementing the agent port.
//!
//! One `ChatBackend` serves every role in a run; role selection happens
//! entirely through the system instruction. Replies are scrubbed of
//! provider reasoning markers before they enter history, since anything
//! stored is fed back as context in later rounds.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use refinement::{AgentError, AgentPort};
use regex::Regex;
use tracing::debug;

use crate::config::BackendConfig;

/// Matched `<think>...</think>` reasoning blocks.
static THINK_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<think>.*?</think>").expect("THINK_BLOCK_RE regex should compile")
});

/// Harmony-style reasoning span: `analysis ... assistantfinal`.
static ANALYSIS_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)analysis.*?assistantfinal").expect("ANALYSIS_SPAN_RE regex should compile")
});

/// Strip provider reasoning markers from a raw reply.
///
/// Removes harmony analysis spans and matched `<think>` blocks; a stray
/// unmatched `</think>` closer means everything before it was reasoning,
/// so only the tail survives.
pub fn scrub_reasoning(text: &str) -> String {
    let text = ANALYSIS_SPAN_RE.replace_all(text, "");
    let text = THINK_BLOCK_RE.replace_all(&text, "");
    let text = text.trim();
    match text.split_once("</think>") {
        Some((_, tail)) => tail.trim().to_string(),
        None => text.to_string(),
    }
}

/// Chat-completions client for any OpenAI-compatible server.
pub struct ChatBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl ChatBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AgentPort for ChatBackend {
    async fn invoke(&self, role_instruction: &str, context: &str) -> Result<String, AgentError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": role_instruction},
                {"role": "user", "content": context}
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": self.config.top_p
        });

        let mut request = self.client.post(self.endpoint()).json(&request_body);
        if let Some(ref key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Backend(format!(
                "chat API error ({}): {}",
                status, body
            )));
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AgentError::Backend(e.to_string()))?;

        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("");
        let cleaned = scrub_reasoning(content);
        if cleaned.is_empty() {
            return Err(AgentError::EmptyResponse);
        }
        debug!(model = %self.config.model, chars = cleaned.len(), "agent reply received");
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_passes_plain_text_through() {
        assert_eq!(scrub_reasoning("a plain reply"), "a plain reply");
        assert_eq!(scrub_reasoning("  padded  "), "padded");
    }

    #[test]
    fn test_scrub_removes_think_block() {
        let raw = "<think>private chain of thought</think>\n{\"STYLE_BRIEF\": {}}";
        assert_eq!(scrub_reasoning(raw), "{\"STYLE_BRIEF\": {}}");
    }

    #[test]
    fn test_scrub_removes_multiple_think_blocks() {
        let raw = "<think>one</think>first<THINK>two</THINK> second";
        assert_eq!(scrub_reasoning(raw), "first second");
    }

    #[test]
    fn test_scrub_keeps_tail_after_stray_closer() {
        let raw = "leaked reasoning without opener</think>the real answer";
        assert_eq!(scrub_reasoning(raw), "the real answer");
    }

    #[test]
    fn test_scrub_removes_analysis_span() {
        let raw = "analysis the model muses here assistantfinal OBJECTS: a fox";
        assert_eq!(scrub_reasoning(raw), "OBJECTS: a fox");
    }

    #[test]
    fn test_scrub_of_pure_reasoning_is_empty() {
        assert_eq!(scrub_reasoning("<think>nothing else</think>"), "");
        assert_eq!(scrub_reasoning(""), "");
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let mut config = BackendConfig::default();
        config.url = "http://localhost:8080/v1/".into();
        let backend = ChatBackend::new(config);
        assert_eq!(backend.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
