use std::time::Duration;

use anyhow::Result;
use async_openai::{config::OpenAIConfig, Client};
use copilot_common::{env_or, env_required};

use crate::{CONNECT_TIMEOUT_SECS, DEFAULT_OPENAI_BASE_URL};

pub(crate) fn build_openai_client() -> Result<Client<OpenAIConfig>> {
    let api_key = env_required("OPENAI_API_KEY")?;
    let base_url = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    let openai_config = OpenAIConfig::new()
        .with_api_base(base_url)
        .with_api_key(api_key);

    // Only connecting is bounded: a completion body may legitimately stream for minutes.
    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()?;

    Ok(Client::build(http_client, openai_config, Default::default()))
}
