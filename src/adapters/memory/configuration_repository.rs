//! In-memory implementation of ConfigurationRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::configuration::ConfigurationRecord;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode};
use crate::ports::ConfigurationRepository;

/// Configuration records keyed by chat.
#[derive(Default)]
pub struct InMemoryConfigurationRepository {
    records: RwLock<HashMap<ChatId, ConfigurationRecord>>,
}

impl InMemoryConfigurationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigurationRepository for InMemoryConfigurationRepository {
    async fn find_by_chat(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<ConfigurationRecord>, DomainError> {
        Ok(self.records.read().await.get(&chat_id).cloned())
    }

    async fn insert(&self, record: &ConfigurationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.chat_id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Configuration already exists for chat {}", record.chat_id),
            ));
        }
        records.insert(record.chat_id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &ConfigurationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.chat_id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ConfigurationNotFound,
                format!("No configuration for chat {}", record.chat_id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::ConfigField;

    #[tokio::test]
    async fn find_or_create_inserts_once() {
        let repo = InMemoryConfigurationRepository::new();
        let chat = ChatId::new(3);

        let created = repo.find_or_create(chat).await.unwrap();
        assert!(created.is_empty());

        let mut changed = created.clone();
        changed.set(ConfigField::TokenName, "FISH".to_string());
        repo.update(&changed).await.unwrap();

        let found = repo.find_or_create(chat).await.unwrap();
        assert_eq!(found.token_name, "FISH");
    }

    #[tokio::test]
    async fn update_of_unknown_chat_is_not_found() {
        let repo = InMemoryConfigurationRepository::new();
        let err = repo
            .update(&ConfigurationRecord::new(ChatId::new(9)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let repo = InMemoryConfigurationRepository::new();
        let record = ConfigurationRecord::new(ChatId::new(1));
        repo.insert(&record).await.unwrap();
        assert!(repo.insert(&record).await.is_err());
    }
}
