use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("bot api request failed: {0}")]
    Request(String),
    #[error("bot api rejected the message: status {0}")]
    Status(u16),
    #[error("no bot token configured")]
    MissingToken,
}

/// Outbound message seam. The ingress awaits the send so failures are
/// observable, but a failed send never fails the webhook acknowledgment.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendError>;
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
}

/// reqwest-backed client for the Bot API `sendMessage` call. Every request
/// carries the configured timeout; a timed-out send counts as a failed send
/// and is not retried here, the user can simply resend the command.
pub struct TelegramBotApi {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl TelegramBotApi {
    pub fn new(
        token: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| SendError::Request(error.to_string()))?;

        Ok(Self { http, base_url: base_url.into(), token })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.token.expose_secret()
        )
    }
}

#[async_trait]
impl BotApi for TelegramBotApi {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        let response = self
            .http
            .post(self.send_message_url())
            .json(&SendMessageBody { chat_id, text })
            .send()
            .await
            .map_err(|error| SendError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Status(status.as_u16()));
        }

        Ok(())
    }
}

/// Wired when no bot token is configured: the ingress keeps acknowledging
/// webhooks while every reply attempt fails visibly in the logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopBotApi;

#[async_trait]
impl BotApi for NoopBotApi {
    async fn send_message(&self, _chat_id: i64, _text: &str) -> Result<(), SendError> {
        Err(SendError::MissingToken)
    }
}
