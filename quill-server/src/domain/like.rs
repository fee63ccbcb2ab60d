use chrono::{DateTime, Utc};

use super::post::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostLike {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) post_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) enum LikeOutcome {
    /// First like by this user; carries the post with the incremented counter.
    Accepted(Post),
    AlreadyLiked,
}
