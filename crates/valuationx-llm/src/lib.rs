//! LLM provider abstraction for ValuationX
//!
//! - Message and completion request/response types
//! - [`LLMProvider`] trait for chat-completion services
//! - JSON-mode helpers for structured model output
//! - OpenAI-compatible provider (behind the `openai` feature)

pub mod completion;
pub mod error;
pub mod json;
pub mod messages;
pub mod provider;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, ResponseFormat, StopReason,
    TokenUsage,
};
pub use error::{LLMError, Result};
pub use json::{extract_json, parse_completion, parse_json};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

#[cfg(feature = "openai")]
pub mod providers;
