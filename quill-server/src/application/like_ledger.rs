use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::like::LikeOutcome;

pub(crate) struct LikeLedger {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeLedger {
    pub(crate) fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    /// Records the first like of `actor_user_id` on a post. Repeated likes,
    /// including one that lost a race against a concurrent like, report
    /// [`LikeOutcome::AlreadyLiked`] and leave the counter untouched.
    pub(crate) async fn record_like(
        &self,
        actor_user_id: i64,
        post_uuid: Uuid,
    ) -> Result<LikeOutcome, DomainError> {
        let post = self
            .posts
            .find_by_uuid(post_uuid)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_uuid))?;

        if self.likes.find_like(actor_user_id, post.id).await?.is_some() {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        match self.likes.insert_like(actor_user_id, post.id).await? {
            Some(post) => {
                info!(post_id = post.id, user_id = actor_user_id, likes = post.likes, "post liked");
                Ok(LikeOutcome::Accepted(post))
            }
            None => Ok(LikeOutcome::AlreadyLiked),
        }
    }
}
