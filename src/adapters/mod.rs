//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - OpenAI and a scripted mock
//! - `http` - the public redirect endpoint
//! - `memory` - in-memory stores and a recording transport
//! - `postgres` - PostgreSQL stores
//! - `telegram` - Telegram Bot API transport and poller

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod telegram;
