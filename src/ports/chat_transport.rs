//! Chat transport port - Interface for sending and deleting chat messages.
//!
//! The orchestrator only ever needs to post a message (optionally with an
//! inline keyboard), delete one of its own or the user's messages, and
//! acknowledge a button press.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ChatId, MessageRef};

/// Port for the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Posts a message and returns its reference.
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutboundMessage,
    ) -> Result<MessageRef, TransportError>;

    /// Deletes a message.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the message is already gone
    async fn delete_message(&self, chat_id: ChatId, message: MessageRef)
        -> Result<(), TransportError>;

    /// Acknowledges a button press so the client stops its spinner.
    async fn answer_button(&self, callback_id: &str) -> Result<(), TransportError>;
}

/// How the text of an outbound message is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// A message to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Option<InlineKeyboard>,
}

impl OutboundMessage {
    /// Plain text message without keyboard.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: None,
        }
    }

    /// HTML formatted message without keyboard.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Iterates over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// What happens when a button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Sends the data back to the bot as a button-press update.
    Callback(String),
    /// Opens a URL in the user's browser.
    Url(String),
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Chat transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform rejected the request.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    /// The referenced message or chat does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the platform response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn api(code: i64, description: impl Into<String>) -> Self {
        Self::Api {
            code,
            description: description.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_builder_keeps_row_order() {
        let keyboard = InlineKeyboard::new()
            .row(vec![
                Button::callback("Back", "back"),
                Button::callback("Cancel", "cancel"),
            ])
            .row(vec![Button::url("Open", "https://example.com")]);

        let labels: Vec<&str> = keyboard.buttons().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Back", "Cancel", "Open"]);
    }

    #[test]
    fn html_message_carries_format() {
        let message = OutboundMessage::html("<b>hi</b>");
        assert_eq!(message.format, TextFormat::Html);
        assert!(message.keyboard.is_none());
    }

    #[test]
    fn transport_error_displays_code() {
        let err = TransportError::api(400, "Bad Request: message can't be deleted");
        assert_eq!(
            err.to_string(),
            "api error 400: Bad Request: message can't be deleted"
        );
    }

    #[test]
    fn chat_transport_is_object_safe() {
        fn _accepts_dyn(_transport: &dyn ChatTransport) {}
    }
}
