use anyhow::{anyhow, Result};
use text_splitter::{ChunkConfig, TextSplitter};

use crate::TokenCounter;

pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 500;
pub const DEFAULT_OVERLAP_TOKENS: usize = 100;

/// Joins the overlap carried over from the previous chunk to the next body.
const OVERLAP_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub max_tokens_per_chunk: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: DEFAULT_MAX_TOKENS_PER_CHUNK,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
        }
    }
}

/// Splits plain text into paragraph-aware windows of at most
/// `max_tokens_per_chunk` tokens. Every window after the first starts with the
/// last `overlap_tokens` tokens of the previous one.
///
/// Bodies are cut by `text-splitter`, which prefers paragraph, then sentence,
/// then word boundaries. The overlap and separator are reserved out of the
/// window so the prefixed chunk still fits.
pub fn split_plain_text_paragraphs(
    text: &str,
    config: &ChunkerConfig,
    counter: &TokenCounter,
) -> Result<Vec<String>> {
    let separator_tokens = if config.overlap_tokens > 0 { counter.count(OVERLAP_SEPARATOR) } else { 0 };
    let reserved = config.overlap_tokens + separator_tokens;
    if reserved >= config.max_tokens_per_chunk {
        return Err(anyhow!(
            "[split_plain_text_paragraphs] overlap of {} tokens leaves no room in chunks of {} tokens",
            config.overlap_tokens,
            config.max_tokens_per_chunk
        ));
    }

    let body_capacity = config.max_tokens_per_chunk - reserved;
    let splitter = TextSplitter::new(ChunkConfig::new(body_capacity).with_sizer(counter.clone()));
    let bodies: Vec<&str> = splitter.chunks(text).collect();

    let mut chunks = Vec::with_capacity(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        if i == 0 || config.overlap_tokens == 0 {
            chunks.push(body.to_string());
            continue;
        }

        let overlap = counter.tail(bodies[i - 1], config.overlap_tokens);
        if overlap.is_empty() {
            chunks.push(body.to_string());
        } else {
            chunks.push(format!("{overlap}{OVERLAP_SEPARATOR}{body}"));
        }
    }

    tracing::debug!(
        "[split_plain_text_paragraphs] {} chunks (max {} tokens, overlap {})",
        chunks.len(),
        config.max_tokens_per_chunk,
        config.overlap_tokens
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> TokenCounter {
        TokenCounter::for_model("gpt-4").unwrap()
    }

    fn paragraph(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_plain_text_paragraphs(
            "A short paragraph.\n\nAnd another one.",
            &ChunkerConfig::default(),
            &counter(),
        ).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("A short paragraph."));
    }

    #[test]
    fn test_empty_text_no_chunks() {
        let chunks = split_plain_text_paragraphs("", &ChunkerConfig::default(), &counter()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_600_token_paragraph_overlaps() {
        let counter = counter();
        let text = paragraph(600);
        let config = ChunkerConfig::default();

        let chunks = split_plain_text_paragraphs(&text, &config, &counter).unwrap();
        assert!(chunks.len() >= 2, "expected at least 2 chunks, got {}", chunks.len());

        for chunk in &chunks {
            assert!(counter.count(chunk) <= config.max_tokens_per_chunk);
        }

        let (overlap, _) = chunks[1].split_once(OVERLAP_SEPARATOR).unwrap();
        assert!(chunks[0].ends_with(overlap));
        let overlap_tokens = counter.count(overlap);
        assert!((95..=100).contains(&overlap_tokens), "overlap was {overlap_tokens} tokens");
    }

    #[test]
    fn test_chunking_is_idempotent() {
        let counter = counter();
        let text = (0..40)
            .map(|i| format!("Paragraph {i} talks about vectors. {}", paragraph(30)))
            .collect::<Vec<_>>()
            .join("\n\n");
        let config = ChunkerConfig::default();

        let first = split_plain_text_paragraphs(&text, &config, &counter).unwrap();
        let second = split_plain_text_paragraphs(&text, &config, &counter).unwrap();
        assert!(first.len() > 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let counter = counter();
        let text = format!("{}\n\n{}", paragraph(300), paragraph(300).replace("word", "other"));
        let config = ChunkerConfig { max_tokens_per_chunk: 500, overlap_tokens: 0 };

        let chunks = split_plain_text_paragraphs(&text, &config, &counter).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].contains("other"));
        assert!(!chunks[1].contains("word"));
    }

    #[test]
    fn test_rejects_overlap_larger_than_chunk() {
        let config = ChunkerConfig { max_tokens_per_chunk: 100, overlap_tokens: 100 };
        assert!(split_plain_text_paragraphs("text", &config, &counter()).is_err());
    }
}
