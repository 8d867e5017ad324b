//! PostgreSQL implementation of ConfigurationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::configuration::ConfigurationRecord;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode, Timestamp};
use crate::ports::ConfigurationRepository;

/// PostgreSQL implementation of the ConfigurationRepository port.
pub struct PostgresConfigurationRepository {
    pool: PgPool,
}

impl PostgresConfigurationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConfigurationRow {
    chat_id: i64,
    token_name: String,
    hashtags: String,
    cashtags: String,
    community: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ConfigurationRow> for ConfigurationRecord {
    fn from(row: ConfigurationRow) -> Self {
        ConfigurationRecord {
            chat_id: ChatId::new(row.chat_id),
            token_name: row.token_name,
            hashtags: row.hashtags,
            cashtags: row.cashtags,
            community: row.community,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl ConfigurationRepository for PostgresConfigurationRepository {
    async fn find_by_chat(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<ConfigurationRecord>, DomainError> {
        let row: Option<ConfigurationRow> = sqlx::query_as(
            r#"
            SELECT chat_id, token_name, hashtags, cashtags, community, created_at, updated_at
            FROM chat_configurations
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find configuration: {}", e),
            )
        })?;

        Ok(row.map(ConfigurationRecord::from))
    }

    async fn insert(&self, record: &ConfigurationRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chat_configurations (
                chat_id, token_name, hashtags, cashtags, community, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.chat_id.as_i64())
        .bind(&record.token_name)
        .bind(&record.hashtags)
        .bind(&record.cashtags)
        .bind(&record.community)
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save configuration: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, record: &ConfigurationRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_configurations SET
                token_name = $2,
                hashtags = $3,
                cashtags = $4,
                community = $5,
                updated_at = $6
            WHERE chat_id = $1
            "#,
        )
        .bind(record.chat_id.as_i64())
        .bind(&record.token_name)
        .bind(&record.hashtags)
        .bind(&record.cashtags)
        .bind(&record.community)
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update configuration: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ConfigurationNotFound,
                "Configuration not found",
            ));
        }

        Ok(())
    }
}
