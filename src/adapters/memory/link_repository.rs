//! In-memory implementation of LinkRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, LinkId};
use crate::domain::reply::GeneratedLinkRecord;
use crate::ports::LinkRepository;

/// Link records keyed by id.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    records: RwLock<HashMap<LinkId, GeneratedLinkRecord>>,
    failing: bool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with `DatabaseError`.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "link store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, record: &GeneratedLinkRecord) -> Result<(), DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Link already exists: {}", record.id),
            ));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LinkId) -> Result<Option<GeneratedLinkRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.get(id).cloned())
    }
}
