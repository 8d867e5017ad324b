//! In-memory adapters.
//!
//! Used when no database URL is configured and by the test suites. Nothing
//! is persisted across restarts.

mod configuration_repository;
mod link_repository;
mod recording_transport;
mod reply_repository;

pub use configuration_repository::InMemoryConfigurationRepository;
pub use link_repository::InMemoryLinkRepository;
pub use recording_transport::{RecordingTransport, SentMessage};
pub use reply_repository::InMemoryReplyRepository;
