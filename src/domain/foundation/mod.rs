//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the step state machine trait and
//! the error types used across the chat, reply and configuration domains.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChatId, LinkId, MessageRef, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
