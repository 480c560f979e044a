mod chunker;
mod copilot;
mod corpus;
mod llm;
mod prompt;
mod tokenizer;

pub use chunker::{split_plain_text_paragraphs, ChunkerConfig, DEFAULT_MAX_TOKENS_PER_CHUNK, DEFAULT_OVERLAP_TOKENS};
pub use copilot::{Copilot, EchoCopilot, FragmentStream, RagCopilot, DEFAULT_ECHO_DELAY};
pub use corpus::{cosine_similarity, Chunk, Corpus};
pub use llm::{Complete, Embed, OpenAiCompleter, OpenAiEmbedder};
pub use prompt::{build_prompt, select_context, ContextSelection, DEFAULT_CONTEXT_TOKEN_BUDGET};
pub use tokenizer::TokenCounter;
