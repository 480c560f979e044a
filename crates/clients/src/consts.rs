pub type Embedding = Vec<f32>;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const CHAT_MODEL: &str = "gpt-4";

/// Upper bound on inputs per embeddings request.
pub const EMBEDDING_BATCH_SIZE: usize = 256;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
