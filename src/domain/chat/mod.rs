//! Chat module - per-chat vocabulary of the orchestrator.
//!
//! Contains the command names recognised in a chat, the normalized inbound
//! update, and the prompt ledger tracking ephemeral outbound prompts.

mod command;
mod ledger;
mod update;

pub use command::{ActiveCommand, CommandName};
pub use ledger::PromptLedger;
pub use update::{InboundUpdate, UpdatePayload, UserIdentity, CANCEL_BUTTON_DATA};
