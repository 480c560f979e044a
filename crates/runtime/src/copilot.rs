use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use copilot_clients::TextStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use crate::{build_prompt, select_context, Complete, Corpus, Embed, DEFAULT_CONTEXT_TOKEN_BUDGET};

/// Finite, single-consumer sequence of answer fragments in production order.
pub type FragmentStream = TextStream;

pub const DEFAULT_ECHO_DELAY: Duration = Duration::from_millis(200);
const ECHO_CHANNEL_CAPACITY: usize = 16;

#[async_trait::async_trait]
pub trait Copilot: Send + Sync {
    /// Everything that can fail before the first fragment fails here; errors
    /// after that arrive as stream items.
    async fn answer(&self, question: &str) -> Result<FragmentStream>;
}

/// Embeds the question, ranks the corpus, packs the best chunks into the token
/// budget and streams the model's completion.
#[derive(Clone)]
pub struct RagCopilot {
    corpus: Arc<Corpus>,
    embedder: Arc<dyn Embed>,
    completer: Arc<dyn Complete>,
    budget: usize,
}

impl RagCopilot {
    pub fn new(corpus: Arc<Corpus>, embedder: Arc<dyn Embed>, completer: Arc<dyn Complete>) -> Self {
        Self {
            corpus,
            embedder,
            completer,
            budget: DEFAULT_CONTEXT_TOKEN_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// The prompt that would be sent to the model for `question`.
    pub async fn prompt_for(&self, question: &str) -> Result<String> {
        let query = self.embedder.embed_one(question).await?;
        let ranked = self.corpus.rank(&query);
        let selection = select_context(ranked.iter().map(|(chunk, _)| *chunk), self.budget);

        tracing::info!(
            "[RagCopilot::prompt_for] question: {} chars, context: {}/{} chunks, {} tokens ({} left), best score: {:?}",
            question.len(),
            selection.chunks.len(),
            ranked.len(),
            selection.tokens_used,
            selection.tokens_remaining,
            ranked.first().map(|(_, score)| *score)
        );

        Ok(build_prompt(question, &selection.chunks))
    }
}

#[async_trait::async_trait]
impl Copilot for RagCopilot {
    async fn answer(&self, question: &str) -> Result<FragmentStream> {
        let prompt = self.prompt_for(question).await?;
        tracing::debug!("[RagCopilot::answer] Prompt: {} bytes", prompt.len());
        self.completer.complete_stream(prompt).await
    }
}

/// Streams the question back one word at a time with a pause between words.
#[derive(Debug, Clone)]
pub struct EchoCopilot {
    delay: Duration,
}

impl EchoCopilot {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for EchoCopilot {
    fn default() -> Self {
        Self::new(DEFAULT_ECHO_DELAY)
    }
}

#[async_trait::async_trait]
impl Copilot for EchoCopilot {
    async fn answer(&self, question: &str) -> Result<FragmentStream> {
        let words = question
            .split_whitespace()
            .map(|word| format!("{word} "))
            .collect::<Vec<_>>();
        let (fragments, _producer) = spawn_echo(words, self.delay);
        Ok(fragments)
    }
}

/// Sends `words` one by one, pausing `delay` between them. The producer exits
/// as soon as the receiving side is dropped, including mid-pause.
fn spawn_echo(words: Vec<String>, delay: Duration) -> (FragmentStream, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(ECHO_CHANNEL_CAPACITY);

    let producer = tokio::spawn(async move {
        for (i, word) in words.into_iter().enumerate() {
            if i > 0 {
                tokio::select! {
                    _ = tx.closed() => {
                        tracing::debug!("[EchoCopilot::answer] Receiver dropped, stopping");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            if tx.send(Ok(word)).await.is_err() {
                tracing::debug!("[EchoCopilot::answer] Receiver dropped, stopping");
                return;
            }
        }
    });

    (ReceiverStream::new(rx).boxed(), producer)
}
