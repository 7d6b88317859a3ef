use crate::config::Config;
use crate::types::{ReplyMessage, ReplyRequest, ReplyReceipt};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tracing::error;

const REPLY_API_URL: &str = "https://api.line.me/v2/bot/message/reply";

/// Outbound reply delivery. The dispatcher only sees this trait, so
/// tests can substitute a mock and count calls.
#[async_trait]
pub trait ReplyDelivery: Send + Sync {
    /// Send one text reply. The reply token is single-use.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<ReplyReceipt>;
}

/// Reply API client. Created once at startup; the reqwest client and
/// the channel access token are shared read-only across all dispatches.
pub struct LineClient {
    client: reqwest::Client,
    channel_access_token: String,
}

impl LineClient {
    pub fn new(config: &Config) -> Self {
        LineClient {
            client: reqwest::Client::new(),
            channel_access_token: config.channel_access_token.clone(),
        }
    }
}

#[async_trait]
impl ReplyDelivery for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<ReplyReceipt> {
        if reply_token.trim().is_empty() {
            bail!("Reply token cannot be empty");
        }

        let reply_request = ReplyRequest {
            reply_token: reply_token.to_string(),
            messages: vec![ReplyMessage {
                message_type: "text".to_string(),
                text: text.to_string(),
            }],
        };

        let response = self
            .client
            .post(REPLY_API_URL)
            .header(
                "Authorization",
                format!("Bearer {}", self.channel_access_token),
            )
            .header("Content-Type", "application/json")
            .json(&reply_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("LINE API error: {}", error_text);

            if error_text.contains("Invalid reply token") {
                // Tokens expire after ~30 seconds and are single-use.
                error!("Reply token is invalid, expired, or already consumed");
            }

            return Err(anyhow!("LINE API error: {}", error_text));
        }

        // The reply endpoint historically returned an empty object.
        let receipt = response
            .json::<ReplyReceipt>()
            .await
            .unwrap_or_default();

        Ok(receipt)
    }
}
