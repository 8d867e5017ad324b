//! Normalized inbound update delivered by the chat transport.

use crate::domain::foundation::{ChatId, MessageRef, UserId};

/// Callback data carried by every Cancel button.
pub const CANCEL_BUTTON_DATA: &str = "cancel";

/// Snapshot of the user who sent an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: Option<String>,
}

impl UserIdentity {
    pub fn new(id: UserId) -> Self {
        Self { id, username: None }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// What the user sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    /// A plain text message.
    Text(String),
    /// An inline keyboard button press with its callback data.
    Button { data: String, callback_id: String },
}

/// One inbound update for one chat.
///
/// `message_ref` is the user's own message for text updates and the message
/// carrying the keyboard for button presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub chat_id: ChatId,
    pub user: UserIdentity,
    pub message_ref: MessageRef,
    pub payload: UpdatePayload,
}

impl InboundUpdate {
    /// Creates a text update.
    pub fn text(
        chat_id: ChatId,
        user: UserIdentity,
        message_ref: MessageRef,
        text: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            user,
            message_ref,
            payload: UpdatePayload::Text(text.into()),
        }
    }

    /// Creates a button-press update.
    pub fn button(
        chat_id: ChatId,
        user: UserIdentity,
        message_ref: MessageRef,
        data: impl Into<String>,
        callback_id: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            user,
            message_ref,
            payload: UpdatePayload::Button {
                data: data.into(),
                callback_id: callback_id.into(),
            },
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// Message text, if this is a text update.
    pub fn text_content(&self) -> Option<&str> {
        match &self.payload {
            UpdatePayload::Text(text) => Some(text),
            UpdatePayload::Button { .. } => None,
        }
    }

    /// Button data, if this is a button press.
    pub fn button_data(&self) -> Option<&str> {
        match &self.payload {
            UpdatePayload::Button { data, .. } => Some(data),
            UpdatePayload::Text(_) => None,
        }
    }

    /// True when this is a press of a Cancel button.
    pub fn is_cancel_button(&self) -> bool {
        self.button_data() == Some(CANCEL_BUTTON_DATA)
    }
}
