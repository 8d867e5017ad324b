//! Telegram adapter: Bot API client, wire types and the update poller.

mod client;
mod dto;
mod poller;

pub use client::{TelegramClient, DEFAULT_API_BASE};
pub use dto::Update;
pub use poller::{ChatWorkers, TelegramPoller};
