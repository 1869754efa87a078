use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::json;

use crate::relay::{ChatResponse, ErrorResponse};

use super::ChatApi;

/// Talks to a running relay's `POST /api/chat`.
pub struct RelayClient {
    endpoint: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// `server` is the relay's base URL, e.g. `http://127.0.0.1:3000`.
    pub fn new(server: &str) -> Self {
        Self {
            endpoint: format!("{}/api/chat", server.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatApi for RelayClient {
    async fn ask(&self, question: &str) -> Result<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "question": question }))
            .send()
            .await
            .context("failed to reach the relay")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            bail!("relay error ({}): {}", status, detail);
        }

        let body: ChatResponse = resp
            .json()
            .await
            .context("relay returned an unexpected body")?;
        Ok(body.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_chat_path() {
        assert_eq!(
            RelayClient::new("http://127.0.0.1:3000").endpoint(),
            "http://127.0.0.1:3000/api/chat"
        );
        assert_eq!(
            RelayClient::new("http://example.test/").endpoint(),
            "http://example.test/api/chat"
        );
    }
}
