//! AI provider port.
//!
//! One instruction in, one completion out. Reply generation owns the length
//! loop and builds a fresh request for every attempt.

use async_trait::async_trait;

use crate::domain::foundation::{ChatId, LinkId};

/// Backend that turns an instruction into reply text.
#[async_trait]
pub trait AIProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AIError>;
}

/// A single instruction sent as the user turn of a fresh conversation.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub instruction: String,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(instruction: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            instruction: instruction.into(),
            metadata,
        }
    }
}

/// Identifies the link and attempt a request belongs to, for logs.
#[derive(Debug, Clone, Copy)]
pub struct RequestMetadata {
    pub chat_id: ChatId,
    pub link_id: LinkId,
    /// Starts at 1.
    pub attempt: u32,
}

impl RequestMetadata {
    pub fn new(chat_id: ChatId, link_id: LinkId, attempt: u32) -> Self {
        Self {
            chat_id,
            link_id,
            attempt,
        }
    }
}

/// Text the backend produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    /// Model that answered.
    pub model: String,
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The backend refused the request as malformed.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
