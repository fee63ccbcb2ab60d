use std::sync::Arc;

use sqlx::PgPool;

use super::like_repository::LikeRepository;
use super::paragraph_repository::ParagraphRepository;
use super::post_repository::PostRepository;
use super::topic_repository::TopicRepository;
use super::user_repository::UserRepository;

#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod postgres;

/// One handle per entity table, shared by the application services.
#[derive(Clone)]
pub(crate) struct Repositories {
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) topics: Arc<dyn TopicRepository>,
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) paragraphs: Arc<dyn ParagraphRepository>,
    pub(crate) likes: Arc<dyn LikeRepository>,
}

impl Repositories {
    pub(crate) fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::user_repository::PostgresUserRepository::new(pool.clone())),
            topics: Arc::new(postgres::topic_repository::PostgresTopicRepository::new(pool.clone())),
            posts: Arc::new(postgres::post_repository::PostgresPostRepository::new(pool.clone())),
            paragraphs: Arc::new(postgres::paragraph_repository::PostgresParagraphRepository::new(
                pool.clone(),
            )),
            likes: Arc::new(postgres::like_repository::PostgresLikeRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub(crate) fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            topics: store.clone(),
            posts: store.clone(),
            paragraphs: store.clone(),
            likes: store,
        }
    }
}
