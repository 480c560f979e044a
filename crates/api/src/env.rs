use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use copilot_clients::{CHAT_MODEL, EMBEDDING_MODEL};
use copilot_common::{env_or, env_parse_or, EnvVars};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopilotMode {
    /// Retrieval over the corpus plus a streamed chat completion.
    Rag,
    /// Streams the question back word by word; needs no provider.
    Echo,
}

impl FromStr for CopilotMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rag" => Ok(Self::Rag),
            "echo" => Ok(Self::Echo),
            other => Err(anyhow!("unknown copilot mode {:?}, expected \"rag\" or \"echo\"", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CopilotEnv {
    pub port: u16,
    pub mode: CopilotMode,
    pub corpus_path: PathBuf,
    pub chat_model: String,
    pub embedding_model: String,
    pub tokenizer_model: String,
    pub echo_delay: Duration,
    pub request_timeout: Duration,
}

impl EnvVars for CopilotEnv {
    fn load() -> Result<Self> {
        let mode = env_or("COPILOT_MODE", "rag").parse()?;

        Ok(Self {
            port: env_parse_or("PORT", 5171)?,
            mode,
            corpus_path: PathBuf::from(env_or("COPILOT_CORPUS_PATH", "TensorPrimitives.netcore.cs")),
            chat_model: env_or("COPILOT_CHAT_MODEL", CHAT_MODEL),
            embedding_model: env_or("COPILOT_EMBEDDING_MODEL", EMBEDDING_MODEL),
            tokenizer_model: env_or("COPILOT_TOKENIZER_MODEL", CHAT_MODEL),
            echo_delay: Duration::from_millis(env_parse_or("COPILOT_ECHO_DELAY_MS", 200)?),
            request_timeout: Duration::from_secs(env_parse_or("COPILOT_REQUEST_TIMEOUT_SECS", 300)?),
        })
    }
}
