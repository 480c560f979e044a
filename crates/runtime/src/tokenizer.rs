use std::sync::Arc;

use anyhow::{anyhow, Result};
use text_splitter::ChunkSizer;
use tiktoken_rs::CoreBPE;

/// Counts tokens the way the chat model does. Used both to size corpus chunks
/// and to spend the prompt budget, so the two always agree.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    model: String,
}

impl TokenCounter {
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| anyhow!("[TokenCounter::for_model] No tokenizer for {}: {}", model, e))?;
        Ok(Self {
            bpe: Arc::new(bpe),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// The text of the last `n` tokens of `text`. If the cut lands inside a
    /// multi-byte character the window shrinks until it decodes.
    pub fn tail(&self, text: &str, n: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        let mut start = tokens.len().saturating_sub(n);

        while start < tokens.len() {
            if let Ok(decoded) = self.bpe.decode(tokens[start..].to_vec()) {
                return decoded;
            }
            start += 1;
        }

        String::new()
    }
}

impl ChunkSizer for TokenCounter {
    fn size(&self, chunk: &str) -> usize {
        self.count(chunk)
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter").field("model", &self.model).finish()
    }
}
