//! Shillbot - Telegram command orchestrator for AI tweet replies
//!
//! Tracks one multi-step dialogue per chat, dispatches incoming messages to
//! the handler owning the chat's current command, and serves the redirect
//! endpoint that turns a generated link into a ready-to-post reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
