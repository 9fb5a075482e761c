use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::TelegramTarget;
use crate::error::RelayError;

/// Delivers a finished message. One attempt, no retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, target: &TelegramTarget, text: &str) -> Result<(), RelayError>;
}

/// Bot API `sendMessage` over HTTPS.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lectio-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, target: &TelegramTarget, text: &str) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.send_message_url(&target.bot_token))
            .json(&json!({ "chat_id": target.chat_id, "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(chat = %target.chat_id, "result delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("https://api.telegram.org/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            notifier.send_message_url("123:abc"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
