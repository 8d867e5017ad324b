//! Command handler contract shared by every conversational flow.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::chat::{ActiveCommand, InboundUpdate};
use crate::domain::foundation::{ChatId, DomainError, ValidationError};
use crate::domain::reply::{PersonaTable, ReplyFlavor};
use crate::ports::{ChatTransport, ConfigurationRepository, LinkRepository, TransportError};

use super::{ConfigureFlow, ReplyFlow};

/// Generic failure text shown when a turn cannot be processed.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Oops, looks like we're having trouble, please try again.";

/// Text shown when something the flow depends on no longer exists.
pub const NOT_FOUND_MESSAGE: &str = "Sorry, I couldn't find that. Please start again.";

/// Acknowledgement sent after an explicit cancel.
pub const CANCELLED_MESSAGE: &str = "cancelled";

/// Why a flow is being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The owner asked to cancel; the chat gets an acknowledgement.
    Requested,
    /// The owner started another command.
    Superseded,
    /// A turn failed; the dispatcher reports the failure itself.
    Failed,
}

/// Errors that end a flow.
///
/// Validation failures never surface here: flows re-prompt in place.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("persistence failure: {0}")]
    Persistence(DomainError),

    #[error("invalid step: {0}")]
    Step(#[from] ValidationError),
}

impl From<DomainError> for FlowError {
    fn from(err: DomainError) -> Self {
        if err.is_not_found() {
            FlowError::NotFound(err.message)
        } else {
            FlowError::Persistence(err)
        }
    }
}

impl FlowError {
    /// Text shown to the chat when this error ends a flow.
    pub fn user_message(&self) -> &'static str {
        match self {
            FlowError::NotFound(_) => NOT_FOUND_MESSAGE,
            FlowError::Transport(_) | FlowError::Persistence(_) | FlowError::Step(_) => {
                GENERIC_FAILURE_MESSAGE
            }
        }
    }
}

/// One conversational flow bound to one chat.
///
/// Handlers guard their own sub-state, so every method takes `&self`. The
/// dispatcher never calls two methods of the same handler concurrently.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Processes one update from the owning user.
    ///
    /// The first call receives the update that invoked the command.
    async fn handle_turn(&self, update: &InboundUpdate) -> Result<(), FlowError>;

    /// Purges outstanding prompts and marks the flow done. Idempotent.
    async fn cancel(&self, reason: CancelReason);

    /// Returns to the first step (or the menu) without marking the flow done.
    async fn reset(&self) -> Result<(), FlowError>;

    /// True once the flow has finished or been cancelled.
    async fn is_done(&self) -> bool;
}

/// Collaborators shared by all flows.
#[derive(Clone)]
pub struct FlowServices {
    pub transport: Arc<dyn ChatTransport>,
    pub links: Arc<dyn LinkRepository>,
    pub configurations: Arc<dyn ConfigurationRepository>,
    pub personas: Arc<PersonaTable>,
    /// Public base URL of the redirect endpoint.
    pub public_url: String,
}

/// Builds a fresh handler for a command in a chat.
pub fn build_handler(
    command: ActiveCommand,
    chat_id: ChatId,
    services: &FlowServices,
) -> Arc<dyn CommandHandler> {
    let services = services.clone();
    match command {
        ActiveCommand::GenerateReply => {
            Arc::new(ReplyFlow::new(chat_id, ReplyFlavor::Shill, services))
        }
        ActiveCommand::Troll => Arc::new(ReplyFlow::new(chat_id, ReplyFlavor::Troll, services)),
        ActiveCommand::Configure => Arc::new(ConfigureFlow::new(chat_id, services)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn not_found_domain_errors_become_not_found() {
        let err: FlowError = DomainError::new(ErrorCode::LinkNotFound, "gone").into();
        assert!(matches!(err, FlowError::NotFound(_)));
        assert_eq!(err.user_message(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn infrastructure_errors_show_generic_message() {
        let err: FlowError = DomainError::new(ErrorCode::DatabaseError, "down").into();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err: FlowError = TransportError::network("reset").into();
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn command_handler_is_object_safe() {
        fn _accepts_dyn(_handler: &dyn CommandHandler) {}
    }
}
