pub mod error;
pub mod openai;
pub mod prompt;

#[derive(Debug, Clone, Copy)]
pub enum Provider {
    OpenAi,
}

/// Templated prompt plus the fixed output budget for one narrative call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Returns the generated text. Transport and API failures propagate to
    /// the caller; there is no retry and no fallback text at this layer.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}
