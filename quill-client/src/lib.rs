//! Клиентская библиотека для работы с quill-server по HTTP.
//!
//! Предоставляет типизированный API (`QuillClient`) поверх REST-интерфейса
//! сервера. Клиент хранит JWT-токен после `register`/`login` и автоматически
//! использует его в защищённых операциях.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{QuillClientError, QuillClientResult};
pub use http_client::HttpClient;
pub use models::{
    AuthResponse, NewParagraph, NewPost, Paragraph, Post, PostDetail, PostListQuery, PostUpdate,
    Topic, User,
};
pub use uuid::Uuid;

#[derive(Debug, Clone)]
/// Клиент блог-сервиса с управлением JWT-токеном.
pub struct QuillClient {
    http: HttpClient,
    token: Option<String>,
}

impl QuillClient {
    /// Создаёт клиент для сервера с базовым URL, например
    /// `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> QuillClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
    ) -> QuillClientResult<AuthResponse> {
        let result = self.http.register(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> QuillClientResult<AuthResponse> {
        let result = self.http.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Проверяет токен и возвращает текущего пользователя.
    pub async fn check(&self) -> QuillClientResult<User> {
        self.http.check(self.require_token()?).await
    }

    /// Меняет имя пользователя и сохраняет выданный сервером новый токен.
    pub async fn update_username(&mut self, username: &str) -> QuillClientResult<AuthResponse> {
        let result = self
            .http
            .update_username(self.require_token()?, username)
            .await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Меняет пароль текущего пользователя.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> QuillClientResult<()> {
        self.http
            .change_password(self.require_token()?, current_password, new_password)
            .await
    }

    /// Возвращает список тем.
    pub async fn list_topics(&self) -> QuillClientResult<Vec<Topic>> {
        self.http.list_topics().await
    }

    /// Возвращает тему по slug.
    pub async fn get_topic(&self, url: &str) -> QuillClientResult<Topic> {
        self.http.get_topic(url).await
    }

    /// Создаёт тему.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_topic(
        &self,
        title: &str,
        description: &str,
        url: Option<&str>,
    ) -> QuillClientResult<Topic> {
        self.http
            .create_topic(self.require_token()?, title, description, url)
            .await
    }

    /// Создаёт новый пост в существующей теме.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_post(&self, post: &NewPost) -> QuillClientResult<PostDetail> {
        self.http.create_post(self.require_token()?, post).await
    }

    /// Возвращает пост с блоками содержимого.
    pub async fn get_post(&self, uuid: Uuid) -> QuillClientResult<PostDetail> {
        self.http.get_post(uuid).await
    }

    /// Обновляет заголовок, описание и текст поста.
    ///
    /// Требует установленный JWT-токен.
    pub async fn update_post(&self, uuid: Uuid, update: &PostUpdate) -> QuillClientResult<Post> {
        self.http
            .update_post(self.require_token()?, uuid, update)
            .await
    }

    /// Удаляет пост.
    ///
    /// Требует установленный JWT-токен.
    pub async fn delete_post(&self, uuid: Uuid) -> QuillClientResult<()> {
        self.http.delete_post(self.require_token()?, uuid).await
    }

    /// Возвращает страницу ленты (не больше 10 постов, от новых к старым).
    pub async fn list_posts(&self, query: &PostListQuery) -> QuillClientResult<Vec<Post>> {
        self.http.list_posts(query).await
    }

    /// Ищет посты по заголовку.
    pub async fn search_posts(&self, pattern: &str) -> QuillClientResult<Vec<Post>> {
        self.http.search_posts(pattern).await
    }

    /// Ставит лайк. Повторный лайк возвращает `QuillClientError::Conflict`.
    ///
    /// Требует установленный JWT-токен.
    pub async fn like_post(&self, uuid: Uuid) -> QuillClientResult<Post> {
        self.http.like_post(self.require_token()?, uuid).await
    }

    /// Добавляет блок содержимого в конец поста.
    ///
    /// Требует установленный JWT-токен.
    pub async fn append_paragraph(
        &self,
        post_uuid: Uuid,
        paragraph: &NewParagraph,
    ) -> QuillClientResult<Paragraph> {
        self.http
            .append_paragraph(self.require_token()?, post_uuid, paragraph)
            .await
    }

    /// Удаляет блок содержимого.
    ///
    /// Требует установленный JWT-токен.
    pub async fn delete_paragraph(&self, uuid: Uuid) -> QuillClientResult<()> {
        self.http.delete_paragraph(self.require_token()?, uuid).await
    }

    /// Возвращает публичный профиль пользователя.
    pub async fn get_user(&self, uuid: Uuid) -> QuillClientResult<User> {
        self.http.get_user(uuid).await
    }

    /// Возвращает посты текущего пользователя.
    pub async fn my_posts(&self) -> QuillClientResult<Vec<Post>> {
        self.http.my_posts(self.require_token()?).await
    }

    /// Возвращает темы текущего пользователя.
    pub async fn my_topics(&self) -> QuillClientResult<Vec<Topic>> {
        self.http.my_topics(self.require_token()?).await
    }

    fn require_token(&self) -> QuillClientResult<&str> {
        self.token.as_deref().ok_or(QuillClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::{QuillClient, QuillClientError, Uuid};

    #[tokio::test]
    async fn protected_calls_fail_fast_without_token() {
        let client = QuillClient::new("http://127.0.0.1:1").expect("client must build");
        let err = client
            .delete_post(Uuid::nil())
            .await
            .expect_err("token is missing");
        assert!(matches!(err, QuillClientError::Unauthorized));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = QuillClient::new("http://127.0.0.1:8080").expect("client must build");
        assert!(client.get_token().is_none());
        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));
        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
