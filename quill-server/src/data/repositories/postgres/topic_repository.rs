use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_foreign_key_violation, storage_error};
use crate::data::topic_repository::{NewTopic, TopicRepository};
use crate::domain::error::DomainError;
use crate::domain::topic::Topic;

#[derive(Debug, Clone)]
pub(crate) struct PostgresTopicRepository {
    pool: PgPool,
}

impl PostgresTopicRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TopicRow {
    id: i64,
    uuid: Uuid,
    title: String,
    description: String,
    url: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
}

const TOPIC_COLUMNS: &str = "id, uuid, title, description, url, owner_id, created_at";

#[async_trait]
impl TopicRepository for PostgresTopicRepository {
    async fn create_topic(&self, input: NewTopic) -> Result<Topic, DomainError> {
        let row = sqlx::query_as::<_, TopicRow>(&format!(
            r#"
            INSERT INTO topics (uuid, title, description, url, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TOPIC_COLUMNS}
            "#
        ))
        .bind(input.uuid)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.url)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_topic_db_error)?;

        map_row_to_topic(row)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Topic>, DomainError> {
        let row = sqlx::query_as::<_, TopicRow>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_topic_db_error)?;

        row.map(map_row_to_topic).transpose()
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, DomainError> {
        let rows = sqlx::query_as::<_, TopicRow>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics ORDER BY title ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_topic_db_error)?;

        rows.into_iter().map(map_row_to_topic).collect()
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Topic>, DomainError> {
        let rows = sqlx::query_as::<_, TopicRow>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE owner_id = $1 ORDER BY id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_topic_db_error)?;

        rows.into_iter().map(map_row_to_topic).collect()
    }
}

fn map_row_to_topic(row: TopicRow) -> Result<Topic, DomainError> {
    Topic::new(
        row.id,
        row.uuid,
        row.title,
        row.description,
        row.url,
        row.owner_id,
        row.created_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_topic_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        return DomainError::AlreadyExists("topic url".to_string());
    }
    if is_foreign_key_violation(&err) {
        return DomainError::NotFound("owner".to_string());
    }
    storage_error(err)
}
