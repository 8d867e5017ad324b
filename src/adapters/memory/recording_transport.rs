//! Recording chat transport.
//!
//! Keeps every posted message in memory and tracks deletions, so tests can
//! assert on what a chat would currently show. Message references are
//! assigned from 1000 upwards.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use crate::domain::foundation::{ChatId, MessageRef};
use crate::ports::{ChatTransport, InlineKeyboard, OutboundMessage, TextFormat, TransportError};

const FIRST_MESSAGE_REF: i64 = 1000;

/// A message posted through the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message_ref: MessageRef,
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Option<InlineKeyboard>,
    pub deleted: bool,
}

#[derive(Default)]
struct Recording {
    next_ref: i64,
    sent: Vec<SentMessage>,
    deleted: HashMap<ChatId, Vec<MessageRef>>,
    undeletable: HashSet<MessageRef>,
    failing_sends: usize,
    answered: Vec<String>,
}

/// In-memory `ChatTransport` that records traffic.
pub struct RecordingTransport {
    inner: Mutex<Recording>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Recording {
                next_ref: FIRST_MESSAGE_REF,
                ..Recording::default()
            }),
        }
    }

    /// Every message posted to a chat, deleted or not, in posting order.
    pub async fn sent_messages(&self, chat_id: ChatId) -> Vec<SentMessage> {
        self.inner
            .lock()
            .await
            .sent
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect()
    }

    /// Posted messages of a chat that were not deleted.
    pub async fn visible_messages(&self, chat_id: ChatId) -> Vec<SentMessage> {
        self.sent_messages(chat_id)
            .await
            .into_iter()
            .filter(|m| !m.deleted)
            .collect()
    }

    /// Deleted message references of a chat in deletion order.
    ///
    /// Includes user messages the bot removed.
    pub async fn deleted_messages(&self, chat_id: ChatId) -> Vec<MessageRef> {
        self.inner
            .lock()
            .await
            .deleted
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes deleting `message` fail with an API error.
    pub async fn fail_deletion_of(&self, message: MessageRef) {
        self.inner.lock().await.undeletable.insert(message);
    }

    /// Makes the next `count` sends fail with a network error.
    pub async fn fail_sends(&self, count: usize) {
        self.inner.lock().await.failing_sends = count;
    }

    /// Callback ids of answered button presses.
    pub async fn answered_buttons(&self) -> Vec<String> {
        self.inner.lock().await.answered.clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutboundMessage,
    ) -> Result<MessageRef, TransportError> {
        let mut inner = self.inner.lock().await;
        if inner.failing_sends > 0 {
            inner.failing_sends -= 1;
            return Err(TransportError::network("connection reset"));
        }

        let message_ref = MessageRef::new(inner.next_ref);
        inner.next_ref += 1;
        inner.sent.push(SentMessage {
            chat_id,
            message_ref,
            text: message.text,
            format: message.format,
            keyboard: message.keyboard,
            deleted: false,
        });
        Ok(message_ref)
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        if inner.undeletable.contains(&message) {
            return Err(TransportError::api(
                400,
                "Bad Request: message can't be deleted",
            ));
        }

        let already_deleted = inner
            .deleted
            .get(&chat_id)
            .is_some_and(|refs| refs.contains(&message));
        if already_deleted {
            let reason = format!("message {}", message.as_i64());
            return Err(TransportError::NotFound(reason));
        }

        if let Some(sent) = inner
            .sent
            .iter_mut()
            .find(|m| m.chat_id == chat_id && m.message_ref == message)
        {
            sent.deleted = true;
        }
        inner.deleted.entry(chat_id).or_default().push(message);
        Ok(())
    }

    async fn answer_button(&self, callback_id: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner.answered.push(callback_id.to_string());
        Ok(())
    }
}
