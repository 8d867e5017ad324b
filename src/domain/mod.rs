//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `chat` - Command names, inbound updates and the prompt ledger
//! - `reply` - Tweet links, generated link records, personas and instructions
//! - `configuration` - Per-chat promotion settings and their validators

pub mod chat;
pub mod configuration;
pub mod foundation;
pub mod reply;
