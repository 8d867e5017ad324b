//! Configuration repository port.
//!
//! One record per chat. Records are created lazily and never deleted.

use async_trait::async_trait;

use crate::domain::configuration::ConfigurationRecord;
use crate::domain::foundation::{ChatId, DomainError};

/// Repository port for per-chat configuration records.
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    /// Find the record of a chat.
    ///
    /// Returns `None` if the chat was never configured.
    async fn find_by_chat(&self, chat_id: ChatId)
        -> Result<Option<ConfigurationRecord>, DomainError>;

    /// Save a new record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure, including a duplicate chat
    async fn insert(&self, record: &ConfigurationRecord) -> Result<(), DomainError>;

    /// Update an existing record.
    ///
    /// # Errors
    ///
    /// - `ConfigurationNotFound` if the chat has no record
    /// - `DatabaseError` on persistence failure
    async fn update(&self, record: &ConfigurationRecord) -> Result<(), DomainError>;

    /// Returns the chat's record, inserting an empty one first if needed.
    async fn find_or_create(&self, chat_id: ChatId) -> Result<ConfigurationRecord, DomainError> {
        if let Some(record) = self.find_by_chat(chat_id).await? {
            return Ok(record);
        }
        let record = ConfigurationRecord::new(chat_id);
        self.insert(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConfigurationRepository) {}
    }
}
