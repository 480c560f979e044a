use anyhow::{anyhow, Result};
use copilot_common::JsonArrayDecoder;
use futures::StreamExt;
use reqwest::Client;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Asks one question and hands every fragment to `on_fragment` as soon as
    /// it is decoded, in arrival order. Returns the number of fragments seen.
    pub async fn ask<F>(&self, question: &str, mut on_fragment: F) -> Result<usize>
    where
        F: FnMut(&str) -> Result<()>,
    {
        let response = self
            .client
            .get(format!("{}/copilot", self.base_url))
            .query(&[("question", question)])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(anyhow!(
                "Failed to ask. Status: {}. Body: {}",
                status,
                text
            ));
        }

        let mut decoder = JsonArrayDecoder::new();
        let mut received = 0;
        let mut body = response.bytes_stream();
        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(|e| anyhow!("Stream interrupted after {} fragments: {}", received, e))?;
            for fragment in decoder.push(&bytes)? {
                on_fragment(&fragment)?;
                received += 1;
            }
        }
        decoder.finish()?;

        tracing::debug!("[ApiClient::ask] {} fragments", received);
        Ok(received)
    }
}
