use anyhow::{anyhow, Result};
use copilot_common::{define_module_client, ModuleClient};

use async_openai::{
    config::OpenAIConfig,
    types::CreateEmbeddingRequestArgs,
    Client
};

use crate::{openai::build_openai_client, Embedding, EMBEDDING_BATCH_SIZE};

define_module_client! {
    (struct EmbederClient, "embeder")
    client_type: Client<OpenAIConfig>,
    env: ["OPENAI_API_KEY"],
    setup: async { build_openai_client() }
}

impl EmbederClient {
    /// Embeds `text` in order, issuing one request per batch. The result has
    /// exactly one vector per input or the call fails.
    pub async fn embed(&self, model: &str, text: Vec<String>) -> Result<Vec<Embedding>> {
        tracing::debug!("[EmbederClient::embed] Embedding {} texts with {}", text.len(), model);
        if text.is_empty() {
            return Ok(vec![]);
        }

        let mut embeddings = Vec::with_capacity(text.len());
        for batch in text.chunks(EMBEDDING_BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(model)
                .input(batch.to_vec())
                .build()?;

            let mut response = self.get_client().embeddings().create(request).await?;
            if response.data.len() != batch.len() {
                return Err(anyhow!(
                    "[EmbederClient::embed] Requested {} embeddings, received {}",
                    batch.len(),
                    response.data.len()
                ));
            }

            response.data.sort_by_key(|item| item.index);
            embeddings.extend(response.data.into_iter().map(|item| item.embedding));
        }

        tracing::debug!("[EmbederClient::embed] Embedding response: {}", embeddings.len());

        Ok(embeddings)
    }
}
