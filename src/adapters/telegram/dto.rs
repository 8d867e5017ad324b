//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads or writes are modelled; everything else in
//! the payloads is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::chat::{InboundUpdate, UserIdentity};
use crate::domain::foundation::{ChatId, MessageRef, UserId};
use crate::ports::{ButtonAction, InlineKeyboard, OutboundMessage, TextFormat};

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    fn identity(&self) -> UserIdentity {
        let identity = UserIdentity::new(UserId::new(self.id));
        match &self.username {
            Some(username) => identity.with_username(username.clone()),
            None => identity,
        }
    }
}

impl Update {
    /// Converts the update into the bot's inbound representation.
    ///
    /// Returns `None` for updates the bot does not handle: non-text
    /// messages, anonymous senders, or button presses without data.
    pub fn into_inbound(self) -> Option<InboundUpdate> {
        if let Some(message) = self.message {
            let user = message.from.as_ref()?.identity();
            let text = message.text?;
            return Some(InboundUpdate::text(
                ChatId::new(message.chat.id),
                user,
                MessageRef::new(message.message_id),
                text,
            ));
        }

        let query = self.callback_query?;
        let message = query.message.as_ref()?;
        Some(InboundUpdate::button(
            ChatId::new(message.chat.id),
            query.from.identity(),
            MessageRef::new(message.message_id),
            query.data?,
            query.id,
        ))
    }
}

// ----- Requests -----

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub disable_web_page_preview: bool,
}

impl SendMessageRequest {
    pub fn new(chat_id: ChatId, message: OutboundMessage) -> Self {
        Self {
            chat_id: chat_id.as_i64(),
            text: message.text,
            parse_mode: match message.format {
                TextFormat::Plain => None,
                TextFormat::Html => Some("HTML"),
            },
            reply_markup: message.keyboard.map(InlineKeyboardMarkup::from),
            disable_web_page_preview: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<InlineKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: InlineKeyboard) -> Self {
        let inline_keyboard = keyboard
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|button| match button.action {
                        ButtonAction::Callback(data) => InlineKeyboardButton {
                            text: button.label,
                            callback_data: Some(data),
                            url: None,
                        },
                        ButtonAction::Url(url) => InlineKeyboardButton {
                            text: button.label,
                            callback_data: None,
                            url: Some(url),
                        },
                    })
                    .collect()
            })
            .collect();
        Self { inline_keyboard }
    }
}

/// Result of `sendMessage`; only the id is kept.
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}
