use anyhow::{anyhow, Result};
use copilot_clients::{EmbederClient, Embedding, LlmClient, TextStream};

/// Text to vector. Implementations must return one vector per input, in order.
#[async_trait::async_trait]
pub trait Embed: Send + Sync {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Embedding>>;

    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        self.embed(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| anyhow!("[Embed::embed_one] No embedding returned"))
    }
}

/// Prompt to a lazily produced sequence of answer fragments.
#[async_trait::async_trait]
pub trait Complete: Send + Sync {
    async fn complete_stream(&self, prompt: String) -> Result<TextStream>;
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: EmbederClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: EmbederClient, model: &str) -> Self {
        Self { client, model: model.to_string() }
    }
}

#[async_trait::async_trait]
impl Embed for OpenAiEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        self.client.embed(&self.model, texts).await
    }
}

#[derive(Clone)]
pub struct OpenAiCompleter {
    client: LlmClient,
    model: String,
}

impl OpenAiCompleter {
    pub fn new(client: LlmClient, model: &str) -> Self {
        Self { client, model: model.to_string() }
    }
}

#[async_trait::async_trait]
impl Complete for OpenAiCompleter {
    async fn complete_stream(&self, prompt: String) -> Result<TextStream> {
        self.client.stream_completion(&self.model, prompt).await
    }
}
