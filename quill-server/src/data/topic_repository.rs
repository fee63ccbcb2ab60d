use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::topic::Topic;

#[derive(Debug, Clone)]
pub(crate) struct NewTopic {
    pub(crate) uuid: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) url: String,
    pub(crate) owner_id: i64,
}

#[async_trait]
pub(crate) trait TopicRepository: Send + Sync {
    async fn create_topic(&self, input: NewTopic) -> Result<Topic, DomainError>;
    async fn find_by_url(&self, url: &str) -> Result<Option<Topic>, DomainError>;
    async fn list_topics(&self) -> Result<Vec<Topic>, DomainError>;
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Topic>, DomainError>;
}
