//! In-memory store implementing every repository trait. Used by tests in
//! place of Postgres; mirrors the schema's unique and cascade rules.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::paragraph_repository::ParagraphRepository;
use crate::data::post_repository::{NewParagraph, NewPost, PostPatch, PostRepository, TitleMatch};
use crate::data::topic_repository::{NewTopic, TopicRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::like::PostLike;
use crate::domain::pagination::PostListQuery;
use crate::domain::paragraph::Paragraph;
use crate::domain::post::Post;
use crate::domain::topic::Topic;
use crate::domain::user::User;

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    topics: Vec<Topic>,
    posts: Vec<Post>,
    paragraphs: Vec<Paragraph>,
    likes: Vec<PostLike>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn in_window(query: PostListQuery, post: &Post) -> bool {
    match query {
        PostListQuery::Latest => true,
        PostListQuery::Older { cursor } => post.id < cursor,
        PostListQuery::Newer { cursor } => post.id > cursor,
        PostListQuery::Topic { topic_id } => post.topic_id == topic_id,
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn paragraph_count(&self) -> usize {
        self.tables.read().await.paragraphs.len()
    }

    pub(crate) async fn like_count(&self) -> usize {
        self.tables.read().await.likes.len()
    }

    pub(crate) async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }

    /// Inserts a post with an explicit id; lets pagination tests control ids.
    pub(crate) async fn insert_post_with_id(&self, id: i64, title: &str, owner_id: i64, topic_id: i64) {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let post = Post::new(id, Uuid::new_v4(), title, "", "", "", 0, owner_id, topic_id, now, now)
            .expect("test post must be valid");
        tables.posts.push(post);
        tables.next_id = tables.next_id.max(id);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|c| c.user.username == input.username || c.user.url == input.url)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let id = tables.next_id();
        let user = User::new(id, input.uuid, input.username, input.url, Utc::now())?;
        tables.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|c| c.user.uuid == uuid)
            .map(|c| c.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn find_credentials_by_id(
        &self,
        id: i64,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|c| c.user.id == id).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        username: &str,
        url: &str,
    ) -> Result<Option<User>, DomainError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|c| c.user.id != id && (c.user.username == username || c.user.url == url))
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        Ok(tables.users.iter_mut().find(|c| c.user.id == id).map(|c| {
            c.user.username = username.to_string();
            c.user.url = url.to_string();
            c.user.clone()
        }))
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .iter_mut()
            .find(|c| c.user.id == id)
            .map(|c| c.password_hash = password_hash.to_string())
            .is_some())
    }
}

#[async_trait]
impl TopicRepository for MemoryStore {
    async fn create_topic(&self, input: NewTopic) -> Result<Topic, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.topics.iter().any(|t| t.url == input.url) {
            return Err(DomainError::AlreadyExists("topic url".to_string()));
        }
        if !tables.users.iter().any(|c| c.user.id == input.owner_id) {
            return Err(DomainError::NotFound("owner".to_string()));
        }

        let id = tables.next_id();
        let topic = Topic::new(
            id,
            input.uuid,
            input.title,
            input.description,
            input.url,
            input.owner_id,
            Utc::now(),
        )?;
        tables.topics.push(topic.clone());
        Ok(topic)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Topic>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.topics.iter().find(|t| t.url == url).cloned())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, DomainError> {
        let tables = self.tables.read().await;
        let mut topics = tables.topics.clone();
        topics.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(topics)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Topic>, DomainError> {
        let tables = self.tables.read().await;
        let mut topics: Vec<Topic> = tables
            .topics
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        topics.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(topics)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(
        &self,
        input: NewPost,
        paragraphs: Vec<NewParagraph>,
    ) -> Result<(Post, Vec<Paragraph>), DomainError> {
        // single write guard: the post and its paragraphs appear together
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|c| c.user.id == input.owner_id) {
            return Err(DomainError::NotFound("owner".to_string()));
        }
        if !tables.topics.iter().any(|t| t.id == input.topic_id) {
            return Err(DomainError::NotFound("topic".to_string()));
        }

        let now = Utc::now();
        let id = tables.next_id();
        let post = Post::new(
            id,
            input.uuid,
            input.title,
            input.description,
            "",
            input.image_url,
            0,
            input.owner_id,
            input.topic_id,
            now,
            now,
        )?;

        let mut stored = Vec::with_capacity(paragraphs.len());
        for paragraph in paragraphs {
            let paragraph_id = tables.next_id();
            stored.push(Paragraph::new(
                paragraph_id,
                paragraph.uuid,
                post.id,
                paragraph.kind,
                paragraph.content,
                now,
            )?);
        }

        tables.posts.push(post.clone());
        tables.paragraphs.extend(stored.iter().cloned());
        Ok((post, stored))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.uuid == uuid).cloned())
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .posts
            .iter_mut()
            .find(|p| p.id == post_id && p.owner_id == owner_id)
            .map(|p| {
                p.title = patch.title;
                p.description = patch.description;
                p.text = patch.text;
                p.updated_at = Utc::now();
                p.clone()
            }))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.paragraphs.retain(|p| p.post_id != id);
        tables.likes.retain(|l| l.post_id != id);
        Ok(true)
    }

    async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| in_window(query, p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(query.limit() as usize);
        Ok(posts)
    }

    async fn search_by_title(
        &self,
        pattern: &str,
        mode: TitleMatch,
    ) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let needle = match mode {
            TitleMatch::CaseSensitive => pattern.to_string(),
            TitleMatch::CaseInsensitive => pattern.to_lowercase(),
        };

        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| match mode {
                TitleMatch::CaseSensitive => p.title.contains(&needle),
                TitleMatch::CaseInsensitive => p.title.to_lowercase().contains(&needle),
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }
}

#[async_trait]
impl ParagraphRepository for MemoryStore {
    async fn append_paragraph(
        &self,
        post_id: i64,
        input: NewParagraph,
    ) -> Result<Paragraph, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }

        let id = tables.next_id();
        let paragraph = Paragraph::new(id, input.uuid, post_id, input.kind, input.content, Utc::now())?;
        tables.paragraphs.push(paragraph.clone());
        Ok(paragraph)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Paragraph>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.paragraphs.iter().find(|p| p.uuid == uuid).cloned())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Paragraph>, DomainError> {
        let tables = self.tables.read().await;
        let mut paragraphs: Vec<Paragraph> = tables
            .paragraphs
            .iter()
            .filter(|p| p.post_id == post_id)
            .cloned()
            .collect();
        paragraphs.sort_by_key(|p| p.id);
        Ok(paragraphs)
    }

    async fn delete_paragraph(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let before = tables.paragraphs.len();
        tables.paragraphs.retain(|p| p.id != id);
        Ok(tables.paragraphs.len() < before)
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn find_like(&self, user_id: i64, post_id: i64) -> Result<Option<PostLike>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Ok(None);
        }

        let id = tables.next_id();
        tables.likes.push(PostLike {
            id,
            user_id,
            post_id,
            created_at: Utc::now(),
        });
        Ok(tables.posts.iter_mut().find(|p| p.id == post_id).map(|p| {
            p.likes += 1;
            p.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::data::post_repository::{NewParagraph, NewPost, PostRepository};
    use crate::data::topic_repository::{NewTopic, TopicRepository};
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::error::DomainError;

    async fn seeded() -> (MemoryStore, i64, i64) {
        let store = MemoryStore::new();
        let owner = store
            .create_user(NewUser {
                uuid: Uuid::new_v4(),
                username: "alice".to_string(),
                url: "alice".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created");
        let topic = store
            .create_topic(NewTopic {
                uuid: Uuid::new_v4(),
                title: "Tech".to_string(),
                description: String::new(),
                url: "tech".to_string(),
                owner_id: owner.id,
            })
            .await
            .expect("topic must be created");
        (store, owner.id, topic.id)
    }

    fn paragraph(kind: &str, content: &str) -> NewParagraph {
        NewParagraph {
            uuid: Uuid::new_v4(),
            kind: kind.to_string(),
            content: content.to_string(),
        }
    }

    fn new_post(owner_id: i64, topic_id: i64) -> NewPost {
        NewPost {
            uuid: Uuid::new_v4(),
            title: "Hello".to_string(),
            description: String::new(),
            image_url: String::new(),
            owner_id,
            topic_id,
        }
    }

    #[tokio::test]
    async fn failed_paragraph_leaves_no_post_behind() {
        let (store, owner_id, topic_id) = seeded().await;

        let err = store
            .create_post(
                new_post(owner_id, topic_id),
                vec![paragraph("text", "stored first"), paragraph("", "rejected")],
            )
            .await
            .expect_err("second paragraph is invalid");
        assert!(matches!(err, DomainError::Validation { .. }));

        assert_eq!(store.post_count().await, 0);
        assert_eq!(store.paragraph_count().await, 0);
    }

    #[tokio::test]
    async fn post_and_paragraphs_are_stored_together_in_order() {
        let (store, owner_id, topic_id) = seeded().await;

        let (post, paragraphs) = store
            .create_post(
                new_post(owner_id, topic_id),
                vec![paragraph("text", "one"), paragraph("code", "two")],
            )
            .await
            .expect("create must succeed");

        assert_eq!(store.post_count().await, 1);
        assert_eq!(store.paragraph_count().await, 2);
        assert!(paragraphs.iter().all(|p| p.post_id == post.id));
        assert_eq!(paragraphs[1].content, "two");
    }
}
