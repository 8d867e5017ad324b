//! PostgreSQL implementation of ReplyRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{ChatId, DomainError, ErrorCode, LinkId, Timestamp};
use crate::domain::reply::ReplyRecord;
use crate::ports::ReplyRepository;

/// PostgreSQL implementation of the ReplyRepository port.
pub struct PostgresReplyRepository {
    pool: PgPool,
}

impl PostgresReplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReplyRow {
    chat_id: i64,
    tweet_id: String,
    link_id: Uuid,
    reply: String,
    created_at: DateTime<Utc>,
}

impl From<ReplyRow> for ReplyRecord {
    fn from(row: ReplyRow) -> Self {
        ReplyRecord {
            chat_id: ChatId::new(row.chat_id),
            tweet_id: row.tweet_id,
            link_id: LinkId::from_uuid(row.link_id),
            reply: row.reply,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl ReplyRepository for PostgresReplyRepository {
    async fn insert(&self, record: &ReplyRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO generated_replies (chat_id, tweet_id, link_id, reply, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.chat_id.as_i64())
        .bind(&record.tweet_id)
        .bind(record.link_id.as_uuid())
        .bind(&record.reply)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save reply: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_link(&self, link_id: &LinkId) -> Result<Vec<ReplyRecord>, DomainError> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            r#"
            SELECT chat_id, tweet_id, link_id, reply, created_at
            FROM generated_replies
            WHERE link_id = $1
            ORDER BY id
            "#,
        )
        .bind(link_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find replies: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(ReplyRecord::from).collect())
    }
}
