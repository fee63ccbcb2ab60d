use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::post_repository::{POST_COLUMNS, PostRow, map_post_db_error, map_row_to_post};
use super::{is_foreign_key_violation, storage_error};
use crate::data::like_repository::LikeRepository;
use crate::domain::error::DomainError;
use crate::domain::like::PostLike;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostLikeRow {
    id: i64,
    user_id: i64,
    post_id: i64,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn find_like(&self, user_id: i64, post_id: i64) -> Result<Option<PostLike>, DomainError> {
        let row = sqlx::query_as::<_, PostLikeRow>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM post_likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_like_db_error)?;

        Ok(row.map(|row| PostLike {
            id: row.id,
            user_id: row.user_id,
            post_id: row.post_id,
            created_at: row.created_at,
        }))
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO post_likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_like_db_error)?;

        if inserted.is_none() {
            // unique (user_id, post_id) already taken; nothing to roll forward
            return Ok(None);
        }

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = likes + 1
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_post_db_error)?
        .ok_or_else(|| DomainError::not_found("post id", post_id))?;
        let post = map_row_to_post(row)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(Some(post))
    }
}

fn map_like_db_error(err: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&err) {
        return DomainError::NotFound("post".to_string());
    }
    storage_error(err)
}
