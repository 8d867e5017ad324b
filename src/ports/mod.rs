//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the orchestrator and the outside world. Adapters implement these ports.
//!
//! - `ChatTransport` - sending, deleting and acknowledging chat messages
//! - `AIProvider` - the generative text backend
//! - `LinkRepository`, `ReplyRepository`, `ConfigurationRepository` - persistence

mod ai_provider;
mod chat_transport;
mod configuration_repository;
mod link_repository;
mod reply_repository;

pub use ai_provider::{AIError, AIProvider, Completion, CompletionRequest, RequestMetadata};
pub use chat_transport::{
    Button, ButtonAction, ChatTransport, InlineKeyboard, OutboundMessage, TextFormat,
    TransportError,
};
pub use configuration_repository::ConfigurationRepository;
pub use link_repository::LinkRepository;
pub use reply_repository::ReplyRepository;
