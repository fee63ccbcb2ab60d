use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::data::topic_repository::{NewTopic, TopicRepository};
use crate::domain::error::DomainError;
use crate::domain::topic::{CreateTopicRequest, Topic};

pub(crate) struct TopicCatalog {
    topics: Arc<dyn TopicRepository>,
}

impl TopicCatalog {
    pub(crate) fn new(topics: Arc<dyn TopicRepository>) -> Self {
        Self { topics }
    }

    /// Translates a client-supplied slug into a topic. Topics are never
    /// created implicitly.
    pub(crate) async fn resolve_by_url(&self, url: &str) -> Result<Topic, DomainError> {
        let url = url.trim().to_ascii_lowercase();
        self.topics
            .find_by_url(&url)
            .await?
            .ok_or_else(|| DomainError::not_found("topic", url))
    }

    pub(crate) async fn create_topic(
        &self,
        owner_id: i64,
        req: CreateTopicRequest,
    ) -> Result<Topic, DomainError> {
        let req = req.validate()?;
        let url = req.url.ok_or(DomainError::Validation {
            field: "url",
            message: "must not be empty",
        })?;

        let topic = self
            .topics
            .create_topic(NewTopic {
                uuid: Uuid::new_v4(),
                title: req.title,
                description: req.description,
                url,
                owner_id,
            })
            .await?;
        info!(topic_id = topic.id, url = %topic.url, owner_id, "topic created");
        Ok(topic)
    }

    pub(crate) async fn get_topic(&self, url: &str) -> Result<Topic, DomainError> {
        self.resolve_by_url(url).await
    }

    pub(crate) async fn list_topics(&self) -> Result<Vec<Topic>, DomainError> {
        self.topics.list_topics().await
    }

    pub(crate) async fn list_user_topics(&self, owner_id: i64) -> Result<Vec<Topic>, DomainError> {
        self.topics.list_by_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::TopicCatalog;
    use crate::data::repositories::memory::MemoryStore;
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::topic::CreateTopicRequest;

    async fn catalog_with_owner() -> (TopicCatalog, i64) {
        let store = Arc::new(MemoryStore::new());
        let owner = store
            .create_user(NewUser {
                uuid: Uuid::new_v4(),
                username: "owner".to_string(),
                url: "owner".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created");
        (TopicCatalog::new(store), owner.id)
    }

    fn request(title: &str, url: Option<&str>) -> CreateTopicRequest {
        CreateTopicRequest {
            title: title.to_string(),
            description: "about".to_string(),
            url: url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn created_topic_resolves_by_slug_case_insensitively() {
        let (catalog, owner_id) = catalog_with_owner().await;
        let topic = catalog
            .create_topic(owner_id, request("Technology", Some("tech")))
            .await
            .expect("create must succeed");

        let resolved = catalog
            .resolve_by_url(" TECH ")
            .await
            .expect("slug must resolve");
        assert_eq!(resolved.id, topic.id);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let (catalog, _) = catalog_with_owner().await;
        let err = catalog
            .resolve_by_url("missing")
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let (catalog, owner_id) = catalog_with_owner().await;
        catalog
            .create_topic(owner_id, request("Self Improvement", None))
            .await
            .expect("first create must succeed");

        let err = catalog
            .create_topic(owner_id, request("Other", Some("self-improvement")))
            .await
            .expect_err("slug is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn list_topics_is_sorted_by_title_and_scoped_per_owner() {
        let (catalog, owner_id) = catalog_with_owner().await;
        catalog
            .create_topic(owner_id, request("Rust", None))
            .await
            .expect("create must succeed");
        catalog
            .create_topic(owner_id, request("Go", None))
            .await
            .expect("create must succeed");

        let titles: Vec<String> = catalog
            .list_topics()
            .await
            .expect("list must succeed")
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Go".to_string(), "Rust".to_string()]);

        assert_eq!(
            catalog
                .list_user_topics(owner_id)
                .await
                .expect("list must succeed")
                .len(),
            2
        );
        assert!(
            catalog
                .list_user_topics(owner_id + 100)
                .await
                .expect("list must succeed")
                .is_empty()
        );
    }
}
