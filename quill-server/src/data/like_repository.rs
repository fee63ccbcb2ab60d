use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::like::PostLike;
use crate::domain::post::Post;

#[async_trait]
pub(crate) trait LikeRepository: Send + Sync {
    async fn find_like(&self, user_id: i64, post_id: i64) -> Result<Option<PostLike>, DomainError>;
    /// Atomically records the like and increments the post's counter.
    /// Returns `None` if a like for `(user_id, post_id)` already exists.
    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<Option<Post>, DomainError>;
}
