//! PostgreSQL implementation of LinkRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{ChatId, DomainError, ErrorCode, LinkId, Timestamp};
use crate::domain::reply::{GeneratedLinkRecord, ReplyFlavor};
use crate::ports::LinkRepository;

/// PostgreSQL implementation of the LinkRepository port.
pub struct PostgresLinkRepository {
    pool: PgPool,
}

impl PostgresLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a generated link.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    chat_id: i64,
    tweet_id: String,
    tweet_link: String,
    tweet_text: String,
    flavor: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for GeneratedLinkRecord {
    type Error = DomainError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        Ok(GeneratedLinkRecord {
            id: LinkId::from_uuid(row.id),
            chat_id: ChatId::new(row.chat_id),
            tweet_id: row.tweet_id,
            tweet_link: row.tweet_link,
            tweet_text: row.tweet_text,
            flavor: parse_flavor(&row.flavor)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_flavor(s: &str) -> Result<ReplyFlavor, DomainError> {
    s.parse::<ReplyFlavor>()
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e))
}

#[async_trait]
impl LinkRepository for PostgresLinkRepository {
    async fn insert(&self, record: &GeneratedLinkRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO generated_links (
                id, chat_id, tweet_id, tweet_link, tweet_text, flavor, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.chat_id.as_i64())
        .bind(&record.tweet_id)
        .bind(&record.tweet_link)
        .bind(&record.tweet_text)
        .bind(record.flavor.as_str())
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save link: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LinkId) -> Result<Option<GeneratedLinkRecord>, DomainError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, chat_id, tweet_id, tweet_link, tweet_text, flavor, created_at
            FROM generated_links
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find link: {}", e),
            )
        })?;

        row.map(GeneratedLinkRecord::try_from).transpose()
    }
}
