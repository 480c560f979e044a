use std::sync::Arc;

use anyhow::{Context, Result};
use copilot_clients::{EmbederClient, LlmClient};
use copilot_common::ModuleClient;
use copilot_runtime::{
    ChunkerConfig, Copilot, Corpus, EchoCopilot, OpenAiCompleter, OpenAiEmbedder, RagCopilot,
    TokenCounter,
};

use crate::{CopilotEnv, CopilotMode};

#[derive(Clone)]
pub struct GlobalState {
    pub copilot: Arc<dyn Copilot>,
}

impl GlobalState {
    pub fn new(copilot: Arc<dyn Copilot>) -> Self {
        Self { copilot }
    }

    /// Builds everything a request needs. In RAG mode this indexes the whole
    /// corpus, so it must finish before the router is served.
    pub async fn from_env(env: &CopilotEnv) -> Result<Self> {
        let copilot: Arc<dyn Copilot> = match env.mode {
            CopilotMode::Echo => {
                tracing::info!("[GlobalState::from_env] Echo mode, delay {:?}", env.echo_delay);
                Arc::new(EchoCopilot::new(env.echo_delay))
            }
            CopilotMode::Rag => Arc::new(Self::setup_rag(env).await?),
        };

        Ok(Self::new(copilot))
    }

    async fn setup_rag(env: &CopilotEnv) -> Result<RagCopilot> {
        let embeder_client = EmbederClient::setup_connection().await?;
        let llm_client = LlmClient::setup_connection().await?;
        let counter = TokenCounter::for_model(&env.tokenizer_model)?;

        let source = tokio::fs::read_to_string(&env.corpus_path)
            .await
            .with_context(|| format!("[GlobalState::setup_rag] Failed to read corpus {}", env.corpus_path.display()))?;
        let text = source.lines().collect::<Vec<_>>().join("\n");
        tracing::info!(
            "[GlobalState::setup_rag] Loaded {} ({} bytes), tokenizer {}",
            env.corpus_path.display(),
            text.len(),
            counter.model()
        );

        let embedder = Arc::new(OpenAiEmbedder::new(embeder_client, &env.embedding_model));
        let corpus = Corpus::build(&text, &ChunkerConfig::default(), &counter, &*embedder)
            .await
            .context("[GlobalState::setup_rag] Failed to index corpus")?;

        let completer = Arc::new(OpenAiCompleter::new(llm_client, &env.chat_model));
        Ok(RagCopilot::new(Arc::new(corpus), embedder, completer))
    }
}
