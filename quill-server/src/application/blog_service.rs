use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::topic_catalog::TopicCatalog;
use crate::data::paragraph_repository::ParagraphRepository;
use crate::data::post_repository::{NewParagraph, NewPost, PostPatch, PostRepository, TitleMatch};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::ownership::authorize_owner;
use crate::domain::pagination::PostListQuery;
use crate::domain::paragraph::{Paragraph, ParagraphDraft};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::domain::user::User;

/// A post together with its author, when the author can still be resolved.
#[derive(Debug, Clone)]
pub(crate) struct PostView {
    pub(crate) post: Post,
    pub(crate) author: Option<User>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) view: PostView,
    pub(crate) paragraphs: Vec<Paragraph>,
}

pub(crate) struct BlogService {
    posts: Arc<dyn PostRepository>,
    paragraphs: Arc<dyn ParagraphRepository>,
    users: Arc<dyn UserRepository>,
    catalog: Arc<TopicCatalog>,
    title_match: TitleMatch,
}

impl BlogService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        paragraphs: Arc<dyn ParagraphRepository>,
        users: Arc<dyn UserRepository>,
        catalog: Arc<TopicCatalog>,
        title_match: TitleMatch,
    ) -> Self {
        Self {
            posts,
            paragraphs,
            users,
            catalog,
            title_match,
        }
    }

    pub(crate) async fn create_post(
        &self,
        actor_user_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostDetail, DomainError> {
        let req = req.validate()?;
        // unknown topic must fail before anything is written
        let topic = self.catalog.resolve_by_url(&req.topic).await?;

        let new_post = NewPost {
            uuid: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            owner_id: actor_user_id,
            topic_id: topic.id,
        };
        let paragraphs = req
            .paragraphs
            .into_iter()
            .map(NewParagraph::from_draft)
            .collect();

        let (post, paragraphs) = self.posts.create_post(new_post, paragraphs).await?;
        info!(
            post_id = post.id,
            owner_id = actor_user_id,
            topic = %topic.url,
            paragraphs = paragraphs.len(),
            "post created"
        );

        Ok(PostDetail {
            view: self.view(post).await?,
            paragraphs,
        })
    }

    pub(crate) async fn get_post(&self, uuid: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find_post(uuid).await?;
        let paragraphs = self.paragraphs.list_for_post(post.id).await?;
        Ok(PostDetail {
            view: self.view(post).await?,
            paragraphs,
        })
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        uuid: Uuid,
        req: UpdatePostRequest,
    ) -> Result<PostView, DomainError> {
        let req = req.validate()?;
        let post = self.find_post(uuid).await?;
        Self::ensure_owner(&post, actor_user_id)?;

        let patch = PostPatch {
            title: req.title,
            description: req.description,
            text: req.text,
        };
        // ownership is re-checked by the store; a concurrent delete surfaces here
        let updated = self
            .posts
            .update_post_owned(post.id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("post", uuid))?;
        info!(post_id = updated.id, owner_id = actor_user_id, "post updated");

        self.view(updated).await
    }

    pub(crate) async fn append_paragraph(
        &self,
        actor_user_id: i64,
        post_uuid: Uuid,
        draft: ParagraphDraft,
    ) -> Result<Paragraph, DomainError> {
        let draft = draft.validate()?;
        let post = self.find_post(post_uuid).await?;
        Self::ensure_owner(&post, actor_user_id)?;

        let paragraph = self
            .paragraphs
            .append_paragraph(post.id, NewParagraph::from_draft(draft))
            .await?;
        info!(post_id = post.id, paragraph_id = paragraph.id, "paragraph appended");
        Ok(paragraph)
    }

    pub(crate) async fn delete_paragraph(
        &self,
        actor_user_id: i64,
        paragraph_uuid: Uuid,
    ) -> Result<(), DomainError> {
        let paragraph = self
            .paragraphs
            .find_by_uuid(paragraph_uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("paragraph", paragraph_uuid))?;
        let post = self
            .posts
            .find_by_id(paragraph.post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post id", paragraph.post_id))?;
        Self::ensure_owner(&post, actor_user_id)?;

        if !self.paragraphs.delete_paragraph(paragraph.id).await? {
            return Err(DomainError::not_found("paragraph", paragraph_uuid));
        }
        info!(post_id = post.id, paragraph_id = paragraph.id, "paragraph deleted");
        Ok(())
    }

    pub(crate) async fn delete_post(&self, actor_user_id: i64, uuid: Uuid) -> Result<(), DomainError> {
        let post = self.find_post(uuid).await?;
        Self::ensure_owner(&post, actor_user_id)?;

        if !self.posts.delete_post(post.id).await? {
            return Err(DomainError::not_found("post", uuid));
        }
        info!(post_id = post.id, owner_id = actor_user_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        topic: Option<&str>,
        cursor: Option<i64>,
        recent: bool,
    ) -> Result<Vec<PostView>, DomainError> {
        let topic_id = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(url) => Some(self.catalog.resolve_by_url(url).await?.id),
            None => None,
        };

        let posts = self
            .posts
            .list_posts(PostListQuery::new(topic_id, cursor, recent))
            .await?;
        self.views(posts).await
    }

    pub(crate) async fn search_posts(&self, pattern: &str) -> Result<Vec<PostView>, DomainError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(DomainError::Validation {
                field: "q",
                message: "must not be empty",
            });
        }

        let posts = self.posts.search_by_title(pattern, self.title_match).await?;
        self.views(posts).await
    }

    pub(crate) async fn list_user_posts(&self, owner_id: i64) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_by_owner(owner_id).await?;
        self.views(posts).await
    }

    /// Attaches the author to a post loaded elsewhere (e.g. after a like).
    pub(crate) async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        let author = self.users.find_by_id(post.owner_id).await?;
        Ok(PostView { post, author })
    }

    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut authors: HashMap<i64, Option<User>> = HashMap::new();
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let author = match authors.get(&post.owner_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.users.find_by_id(post.owner_id).await?;
                    authors.insert(post.owner_id, author.clone());
                    author
                }
            };
            views.push(PostView { post, author });
        }
        Ok(views)
    }

    async fn find_post(&self, uuid: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("post", uuid))
    }

    fn ensure_owner(post: &Post, actor_user_id: i64) -> Result<(), DomainError> {
        authorize_owner(post.owner_id, actor_user_id).inspect_err(|_| {
            warn!(
                post_id = post.id,
                owner_id = post.owner_id,
                actor_user_id,
                "mutation rejected: actor is not the owner"
            );
        })
    }
}
