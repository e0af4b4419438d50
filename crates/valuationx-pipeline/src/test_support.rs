//! Hand-written LLM double shared by the pipeline tests

use async_trait::async_trait;
use std::sync::Mutex;
use valuationx_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};

/// Replies with fixed content (or fails) and records every request
pub struct ScriptedProvider {
    reply: Option<String>,
    stop_reason: StopReason,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            stop_reason: StopReason::EndTurn,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `partial` as if the token limit cut it off
    pub fn truncated(partial: &str) -> Self {
        Self {
            stop_reason: StopReason::MaxTokens,
            ..Self::replying(partial)
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            stop_reason: StopReason::EndTurn,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> valuationx_llm::Result<CompletionResponse> {
        let max_tokens = request.max_tokens;
        self.requests.lock().unwrap().push(request);
        let content = self
            .reply
            .clone()
            .ok_or_else(|| LLMError::RequestFailed("HTTP 503: upstream unavailable".to_string()))?;

        let output_tokens = match self.stop_reason {
            StopReason::MaxTokens => max_tokens,
            _ => content.len() / 4,
        };

        Ok(CompletionResponse {
            message: Message::assistant(content),
            stop_reason: self.stop_reason,
            usage: TokenUsage {
                input_tokens: 400,
                output_tokens,
            },
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
