//! Telegram Bot API client.
//!
//! Implements `ChatTransport` over plain HTTPS calls and exposes
//! `getUpdates` long polling for the poller.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::dto::{
    AnswerCallbackQueryRequest, ApiResponse, DeleteMessageRequest, GetUpdatesRequest,
    SendMessageRequest, SentMessage, Update,
};
use crate::domain::foundation::{ChatId, MessageRef};
use crate::ports::{ChatTransport, OutboundMessage, TransportError};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Slack added to the HTTP timeout on top of the long-poll timeout.
const POLL_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// HTTP client bound to one bot token.
pub struct TelegramClient {
    http: Client,
    api_base: String,
    token: Secret<String>,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(
        token: Secret<String>,
        api_base: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(poll_timeout + POLL_TIMEOUT_SLACK)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        let token = self.token.expose_secret();
        format!("{}/bot{}/{}", self.api_base, token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // Request errors may embed the URL, which carries the token.
                TransportError::network(format!("{} failed: {}", method, e.without_url()))
            })?;

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| {
                TransportError::Parse(format!("{} response: {}", method, e.without_url()))
            })?;

        into_result(method, parsed)
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message", "callback_query"],
        };
        self.call("getUpdates", &request).await
    }
}

/// Unwraps a Bot API envelope.
fn into_result<T>(method: &str, response: ApiResponse<T>) -> Result<T, TransportError> {
    if !response.ok {
        let description = response
            .description
            .unwrap_or_else(|| format!("{} failed", method));
        if description.contains("not found") {
            return Err(TransportError::NotFound(description));
        }
        return Err(TransportError::api(
            response.error_code.unwrap_or_default(),
            description,
        ));
    }
    response
        .result
        .ok_or_else(|| TransportError::Parse(format!("{} returned no result", method)))
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutboundMessage,
    ) -> Result<MessageRef, TransportError> {
        let sent: SentMessage = self
            .call("sendMessage", &SendMessageRequest::new(chat_id, message))
            .await?;
        debug!(chat_id = %chat_id, message_id = sent.message_id, "Sent message");
        Ok(MessageRef::new(sent.message_id))
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
    ) -> Result<(), TransportError> {
        let request = DeleteMessageRequest {
            chat_id: chat_id.as_i64(),
            message_id: message.as_i64(),
        };
        let _: bool = self.call("deleteMessage", &request).await?;
        Ok(())
    }

    async fn answer_button(&self, callback_id: &str) -> Result<(), TransportError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: callback_id,
        };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}
