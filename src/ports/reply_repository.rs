//! Reply record repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LinkId};
use crate::domain::reply::ReplyRecord;

/// Repository port for generated replies.
#[async_trait]
pub trait ReplyRepository: Send + Sync {
    /// Save a reply.
    async fn insert(&self, record: &ReplyRecord) -> Result<(), DomainError>;

    /// All replies generated from one link, oldest first.
    async fn find_by_link(&self, link_id: &LinkId) -> Result<Vec<ReplyRecord>, DomainError>;
}
