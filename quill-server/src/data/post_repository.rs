use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::pagination::PostListQuery;
use crate::domain::paragraph::{Paragraph, ParagraphDraft};
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) uuid: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) image_url: String,
    pub(crate) owner_id: i64,
    pub(crate) topic_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct NewParagraph {
    pub(crate) uuid: Uuid,
    pub(crate) kind: String,
    pub(crate) content: String,
}

impl NewParagraph {
    pub(crate) fn from_draft(draft: ParagraphDraft) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: draft.kind,
            content: draft.content,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TitleMatch {
    CaseSensitive,
    CaseInsensitive,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// Persists the post and its initial paragraphs (in order) as one unit:
    /// either everything is stored or nothing is.
    async fn create_post(
        &self,
        input: NewPost,
        paragraphs: Vec<NewParagraph>,
    ) -> Result<(Post, Vec<Paragraph>), DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, DomainError>;
    /// Returns `None` when no post with `post_id` is owned by `owner_id`.
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    /// Deleting a post removes its paragraphs and likes as well.
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, DomainError>;
    async fn search_by_title(
        &self,
        pattern: &str,
        mode: TitleMatch,
    ) -> Result<Vec<Post>, DomainError>;
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Post>, DomainError>;
}
