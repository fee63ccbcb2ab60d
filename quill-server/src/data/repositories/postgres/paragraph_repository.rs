use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_foreign_key_violation, storage_error};
use crate::data::paragraph_repository::ParagraphRepository;
use crate::data::post_repository::NewParagraph;
use crate::domain::error::DomainError;
use crate::domain::paragraph::Paragraph;

#[derive(Debug, Clone)]
pub(crate) struct PostgresParagraphRepository {
    pool: PgPool,
}

impl PostgresParagraphRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ParagraphRow {
    id: i64,
    uuid: Uuid,
    post_id: i64,
    kind: String,
    content: String,
    created_at: DateTime<Utc>,
}

pub(super) const PARAGRAPH_COLUMNS: &str = "id, uuid, post_id, kind, content, created_at";

pub(super) fn insert_paragraph_sql() -> String {
    format!(
        r#"
        INSERT INTO paragraphs (uuid, post_id, kind, content)
        VALUES ($1, $2, $3, $4)
        RETURNING {PARAGRAPH_COLUMNS}
        "#
    )
}

#[async_trait]
impl ParagraphRepository for PostgresParagraphRepository {
    async fn append_paragraph(
        &self,
        post_id: i64,
        input: NewParagraph,
    ) -> Result<Paragraph, DomainError> {
        let row = sqlx::query_as::<_, ParagraphRow>(&insert_paragraph_sql())
            .bind(input.uuid)
            .bind(post_id)
            .bind(&input.kind)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await
            .map_err(map_paragraph_db_error)?;

        map_row_to_paragraph(row)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Paragraph>, DomainError> {
        let row = sqlx::query_as::<_, ParagraphRow>(&format!(
            "SELECT {PARAGRAPH_COLUMNS} FROM paragraphs WHERE uuid = $1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_paragraph_db_error)?;

        row.map(map_row_to_paragraph).transpose()
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Paragraph>, DomainError> {
        let rows = sqlx::query_as::<_, ParagraphRow>(&format!(
            "SELECT {PARAGRAPH_COLUMNS} FROM paragraphs WHERE post_id = $1 ORDER BY id ASC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_paragraph_db_error)?;

        rows.into_iter().map(map_row_to_paragraph).collect()
    }

    async fn delete_paragraph(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM paragraphs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_paragraph_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

pub(super) fn map_row_to_paragraph(row: ParagraphRow) -> Result<Paragraph, DomainError> {
    Paragraph::new(
        row.id,
        row.uuid,
        row.post_id,
        row.kind,
        row.content,
        row.created_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

pub(super) fn map_paragraph_db_error(err: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&err) {
        return DomainError::NotFound("post".to_string());
    }
    storage_error(err)
}
