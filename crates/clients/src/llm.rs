use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client
};
use copilot_common::{define_module_client, ModuleClient};
use futures::{future, stream::BoxStream, StreamExt};

use crate::openai::build_openai_client;

pub type TextStream = BoxStream<'static, Result<String>>;

define_module_client! {
    (struct LlmClient, "llm")
    client_type: Client<OpenAIConfig>,
    env: ["OPENAI_API_KEY"],
    setup: async { build_openai_client() }
}

impl LlmClient {
    /// Sends `prompt` as a single user message and streams back the content
    /// deltas in generation order. Deltas without content are skipped.
    pub async fn stream_completion(&self, model: &str, prompt: String) -> Result<TextStream> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| anyhow!("[LlmClient::stream_completion] Failed to pack message: {}", e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(message)])
            .stream(true)
            .build()?;

        let stream = self.get_client().chat().create_stream(request).await?;
        tracing::debug!("[LlmClient::stream_completion] Stream opened for model {}", model);

        let fragments = stream.filter_map(|response| {
            future::ready(match response {
                Ok(response) => {
                    let content: String = response
                        .choices
                        .into_iter()
                        .filter_map(|choice| choice.delta.content)
                        .collect();
                    (!content.is_empty()).then_some(Ok(content))
                }
                Err(e) => Some(Err(anyhow!("[LlmClient::stream_completion] {}", e))),
            })
        });

        Ok(fragments.boxed())
    }
}
