//! Process-wide store of per-chat command state.
//!
//! One coarse lock guards the chat map and is held only while the map is
//! read or mutated. Each entry carries its own async lock, which the
//! dispatcher holds for a whole update so that updates for one chat are
//! processed one at a time, in arrival order, without blocking other chats.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::flows::CommandHandler;
use crate::domain::chat::{ActiveCommand, UserIdentity};
use crate::domain::foundation::ChatId;

/// Which command owns a chat, who started it, and its live handler.
#[derive(Clone, Default)]
pub struct ChatState {
    pub active: Option<ActiveCommand>,
    pub initiating_user: Option<UserIdentity>,
    pub handler: Option<Arc<dyn CommandHandler>>,
}

impl ChatState {
    /// Active state owned by `user`.
    pub fn active(
        command: ActiveCommand,
        user: UserIdentity,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            active: Some(command),
            initiating_user: Some(user),
            handler: Some(handler),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Returns the chat to idle, dropping the handler.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Debug for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatState")
            .field("active", &self.active)
            .field("initiating_user", &self.initiating_user)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Per-chat lane: the entry lock serializing one chat's updates.
pub type ChatLane = Arc<Mutex<ChatState>>;

/// Map of chat id to chat state.
#[derive(Default)]
pub struct ChatStateStore {
    chats: Mutex<HashMap<ChatId, ChatLane>>,
}

impl ChatStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chat's lane, creating an idle entry if there is none.
    pub async fn lane(&self, chat_id: ChatId) -> ChatLane {
        let mut chats = self.chats.lock().await;
        chats.entry(chat_id).or_default().clone()
    }

    /// Snapshot of a chat's state, if the chat has an entry.
    ///
    /// Waits for any update currently being processed for the chat.
    pub async fn resolve(&self, chat_id: ChatId) -> Option<ChatState> {
        let lane = {
            let chats = self.chats.lock().await;
            chats.get(&chat_id).cloned()
        }?;
        let state = lane.lock().await;
        Some(state.clone())
    }

    /// Replaces a chat's state.
    ///
    /// Must not be called while holding the chat's lane.
    pub async fn set(&self, chat_id: ChatId, state: ChatState) {
        let lane = self.lane(chat_id).await;
        *lane.lock().await = state;
    }

    /// Removes the chat's entry if it is idle and nobody else holds its lane.
    ///
    /// Lanes are only handed out under the map lock, so a strong count of one
    /// observed under that lock means no update is in flight for the chat.
    pub async fn evict_if_idle(&self, chat_id: ChatId) -> bool {
        let mut chats = self.chats.lock().await;
        let evictable = match chats.get(&chat_id) {
            Some(lane) if Arc::strong_count(lane) == 1 => match lane.try_lock() {
                Ok(state) => state.is_idle(),
                Err(_) => false,
            },
            _ => false,
        };
        if evictable {
            chats.remove(&chat_id);
        }
        evictable
    }

    /// Number of chats with an entry.
    pub async fn len(&self) -> usize {
        self.chats.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chats.lock().await.is_empty()
    }
}
