//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// One call is one attempt. Implementations must not retry internally: the
/// caller decides what to do with a failure, and for plan generation that is
/// always an immediate local fallback.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier this client sends requests to
    fn model(&self) -> &str;
}
