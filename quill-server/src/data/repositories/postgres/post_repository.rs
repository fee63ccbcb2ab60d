use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::paragraph_repository::{
    ParagraphRow, insert_paragraph_sql, map_paragraph_db_error, map_row_to_paragraph,
};
use super::{is_foreign_key_violation, storage_error};
use crate::data::post_repository::{NewParagraph, NewPost, PostPatch, PostRepository, TitleMatch};
use crate::domain::error::DomainError;
use crate::domain::pagination::PostListQuery;
use crate::domain::paragraph::Paragraph;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PostRow {
    id: i64,
    uuid: Uuid,
    title: String,
    description: String,
    text: String,
    image_url: String,
    likes: i64,
    owner_id: i64,
    topic_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(super) const POST_COLUMNS: &str = "id, uuid, title, description, text, image_url, likes, \
     owner_id, topic_id, created_at, updated_at";

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(
        &self,
        input: NewPost,
        paragraphs: Vec<NewParagraph>,
    ) -> Result<(Post, Vec<Paragraph>), DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (uuid, title, description, image_url, owner_id, topic_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(input.uuid)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.owner_id)
        .bind(input.topic_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_post_db_error)?;
        let post = map_row_to_post(row)?;

        let insert_sql = insert_paragraph_sql();
        let mut stored = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            let row = sqlx::query_as::<_, ParagraphRow>(&insert_sql)
                .bind(paragraph.uuid)
                .bind(post.id)
                .bind(&paragraph.kind)
                .bind(&paragraph.content)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_paragraph_db_error)?;
            stored.push(map_row_to_paragraph(row)?);
        }

        tx.commit().await.map_err(storage_error)?;
        Ok((post, stored))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE uuid = $1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET title = $3,
                description = $4,
                text = $5,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(owner_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        // paragraphs and post_likes go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts"));
        match query {
            PostListQuery::Latest => {}
            PostListQuery::Older { cursor } => {
                builder.push(" WHERE id < ").push_bind(cursor);
            }
            PostListQuery::Newer { cursor } => {
                builder.push(" WHERE id > ").push_bind(cursor);
            }
            PostListQuery::Topic { topic_id } => {
                builder.push(" WHERE topic_id = ").push_bind(topic_id);
            }
        }
        builder
            .push(" ORDER BY id DESC LIMIT ")
            .push_bind(i64::from(query.limit()));

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn search_by_title(
        &self,
        pattern: &str,
        mode: TitleMatch,
    ) -> Result<Vec<Post>, DomainError> {
        let operator = match mode {
            TitleMatch::CaseSensitive => "LIKE",
            TitleMatch::CaseInsensitive => "ILIKE",
        };

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE title {operator} $1 ORDER BY id DESC"
        ))
        .bind(contains_pattern(pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE owner_id = $1 ORDER BY id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

/// `%needle%` with LIKE metacharacters in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(super) fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.uuid,
        row.title,
        row.description,
        row.text,
        row.image_url,
        row.likes,
        row.owner_id,
        row.topic_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

pub(super) fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&err) {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.constraint() == Some("posts_topic_id_fkey")
        {
            return DomainError::NotFound("topic".to_string());
        }
        return DomainError::NotFound("owner".to_string());
    }
    storage_error(err)
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn contains_pattern_wraps_needle() {
        assert_eq!(contains_pattern("foo"), "%foo%");
    }

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
