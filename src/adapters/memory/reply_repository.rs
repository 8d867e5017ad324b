//! In-memory implementation of ReplyRepository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, LinkId};
use crate::domain::reply::ReplyRecord;
use crate::ports::ReplyRepository;

/// Reply records in insertion order.
#[derive(Default)]
pub struct InMemoryReplyRepository {
    records: RwLock<Vec<ReplyRecord>>,
    failing: bool,
}

impl InMemoryReplyRepository {
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

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "reply store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplyRepository for InMemoryReplyRepository {
    async fn insert(&self, record: &ReplyRecord) -> Result<(), DomainError> {
        self.check_available()?;
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_link(&self, link_id: &LinkId) -> Result<Vec<ReplyRecord>, DomainError> {
        self.check_available()?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &r.link_id == link_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ChatId;
    use crate::domain::reply::{GeneratedLinkRecord, ReplyFlavor};

    fn link() -> GeneratedLinkRecord {
        GeneratedLinkRecord::new(
            ChatId::new(5),
            "7",
            "https://twitter.com/a/status/7",
            "hello",
            ReplyFlavor::Troll,
        )
    }

    #[tokio::test]
    async fn replies_are_grouped_by_link() {
        let repo = InMemoryReplyRepository::new();
        let first = link();
        let second = link();

        for (link, reply) in [(&first, "one"), (&second, "two"), (&first, "three")] {
            let record = ReplyRecord::for_link(link, reply);
            repo.insert(&record).await.unwrap();
        }

        let replies: Vec<String> = repo
            .find_by_link(&first.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.reply)
            .collect();
        assert_eq!(replies, vec!["one", "three"]);
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn failing_repository_errors() {
        let repo = InMemoryReplyRepository::failing();
        let err = repo
            .insert(&ReplyRecord::for_link(&link(), "x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
