use anyhow::{anyhow, Result};
use copilot_clients::Embedding;

use crate::{split_plain_text_paragraphs, ChunkerConfig, Embed, TokenCounter};

/// A span of the source text with its embedding. `tokens` is measured once at
/// indexing time with the same counter that spends the prompt budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub vector: Embedding,
    pub tokens: usize,
}

/// Chunks of the source file in source order. Built once at startup and only
/// read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Chunks `text` and embeds every chunk. Any embedding failure fails the
    /// whole build; there is no partial corpus.
    pub async fn build(
        text: &str,
        config: &ChunkerConfig,
        counter: &TokenCounter,
        embedder: &dyn Embed,
    ) -> Result<Self> {
        let contents = split_plain_text_paragraphs(text, config, counter)?;
        tracing::info!("[Corpus::build] Embedding {} chunks", contents.len());

        let vectors = embedder.embed(contents.clone()).await?;
        if vectors.len() != contents.len() {
            return Err(anyhow!(
                "[Corpus::build] Expected {} embeddings, got {}",
                contents.len(),
                vectors.len()
            ));
        }

        let chunks = contents
            .into_iter()
            .zip(vectors)
            .map(|(content, vector)| Chunk {
                tokens: counter.count(&content),
                content,
                vector,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "[Corpus::build] Corpus ready: {} chunks, {} tokens",
            chunks.len(),
            chunks.iter().map(|c| c.tokens).sum::<usize>()
        );

        Ok(Self { chunks })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Every chunk with its cosine similarity to `query`, most similar first.
    /// Equal scores keep source order.
    pub fn rank(&self, query: &[f32]) -> Vec<(&Chunk, f32)> {
        let mut ranked = self
            .chunks
            .iter()
            .map(|chunk| (chunk, cosine_similarity(query, &chunk.vector)))
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

pub fn cosine_similarity(v1: &[f32], v2: &[f32]) -> f32 {
    let dot_product: f32 = v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum();
    let norm1: f32 = v1.iter().map(|a| a * a).sum::<f32>().sqrt();
    let norm2: f32 = v2.iter().map(|a| a * a).sum::<f32>().sqrt();

    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    dot_product / (norm1 * norm2)
}
