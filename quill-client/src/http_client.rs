use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{QuillClientError, QuillClientResult};
use crate::models::{
    AuthResponse, NewParagraph, NewPost, Paragraph, Post, PostDetail, PostListQuery, PostUpdate,
    Topic, User,
};

#[derive(Debug, Serialize)]
struct CredentialsDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateProfileDto<'a> {
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangePasswordDto<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTopicDto<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `quill-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> QuillClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> QuillClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        QuillClientError::from_http_status(status, Some(message))
    }

    async fn execute(request: RequestBuilder) -> QuillClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(QuillClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(request: RequestBuilder) -> QuillClientResult<T> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(QuillClientError::from_reqwest)
    }

    /// Регистрирует пользователя и возвращает JWT + данные пользователя.
    pub async fn register(&self, username: &str, password: &str) -> QuillClientResult<AuthResponse> {
        let payload = CredentialsDto { username, password };
        Self::execute_json(
            self.request(Method::POST, "/api/auth/register", None)
                .json(&payload),
        )
        .await
    }

    /// Выполняет вход пользователя и возвращает JWT + данные пользователя.
    pub async fn login(&self, username: &str, password: &str) -> QuillClientResult<AuthResponse> {
        let payload = CredentialsDto { username, password };
        Self::execute_json(self.request(Method::POST, "/api/auth/login", None).json(&payload)).await
    }

    /// Возвращает пользователя, которому принадлежит токен.
    pub async fn check(&self, token: &str) -> QuillClientResult<User> {
        Self::execute_json(self.request(Method::GET, "/api/auth/check", Some(token))).await
    }

    /// Меняет имя пользователя; сервер выдаёт новый токен.
    pub async fn update_username(
        &self,
        token: &str,
        username: &str,
    ) -> QuillClientResult<AuthResponse> {
        let payload = UpdateProfileDto { username };
        Self::execute_json(
            self.request(Method::PATCH, "/api/auth/update", Some(token))
                .json(&payload),
        )
        .await
    }

    /// Меняет пароль после проверки текущего.
    pub async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> QuillClientResult<()> {
        let payload = ChangePasswordDto {
            current_password,
            new_password,
        };
        Self::execute(
            self.request(Method::PATCH, "/api/auth/update/password", Some(token))
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    /// Возвращает все темы, отсортированные по названию.
    pub async fn list_topics(&self) -> QuillClientResult<Vec<Topic>> {
        Self::execute_json(self.request(Method::GET, "/api/topics", None)).await
    }

    /// Возвращает тему по slug.
    pub async fn get_topic(&self, url: &str) -> QuillClientResult<Topic> {
        Self::execute_json(self.request(Method::GET, &format!("/api/topics/{}", url.trim()), None))
            .await
    }

    /// Создаёт тему. Без `url` slug выводится из названия.
    pub async fn create_topic(
        &self,
        token: &str,
        title: &str,
        description: &str,
        url: Option<&str>,
    ) -> QuillClientResult<Topic> {
        let payload = CreateTopicDto {
            title,
            description,
            url,
        };
        Self::execute_json(self.request(Method::POST, "/api/topics", Some(token)).json(&payload))
            .await
    }

    /// Создаёт пост вместе с блоками содержимого.
    pub async fn create_post(&self, token: &str, post: &NewPost) -> QuillClientResult<PostDetail> {
        Self::execute_json(self.request(Method::POST, "/api/posts", Some(token)).json(post)).await
    }

    /// Получает пост с блоками содержимого.
    pub async fn get_post(&self, uuid: Uuid) -> QuillClientResult<PostDetail> {
        Self::execute_json(self.request(Method::GET, &format!("/api/posts/{uuid}"), None)).await
    }

    /// Заменяет редактируемые поля поста.
    pub async fn update_post(
        &self,
        token: &str,
        uuid: Uuid,
        update: &PostUpdate,
    ) -> QuillClientResult<Post> {
        Self::execute_json(
            self.request(Method::PATCH, &format!("/api/posts/{uuid}"), Some(token))
                .json(update),
        )
        .await
    }

    /// Удаляет пост вместе с блоками и лайками.
    pub async fn delete_post(&self, token: &str, uuid: Uuid) -> QuillClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/posts/{uuid}"), Some(token)))
            .await?;
        Ok(())
    }

    /// Возвращает страницу ленты.
    pub async fn list_posts(&self, query: &PostListQuery) -> QuillClientResult<Vec<Post>> {
        Self::execute_json(self.list_posts_request(query)).await
    }

    fn list_posts_request(&self, query: &PostListQuery) -> RequestBuilder {
        self.request(Method::GET, "/api/posts", None).query(query)
    }

    /// Ищет посты по вхождению строки в заголовок.
    pub async fn search_posts(&self, pattern: &str) -> QuillClientResult<Vec<Post>> {
        Self::execute_json(
            self.request(Method::GET, "/api/posts/search", None)
                .query(&SearchQuery { q: pattern }),
        )
        .await
    }

    /// Ставит лайк посту и возвращает обновлённый пост.
    pub async fn like_post(&self, token: &str, uuid: Uuid) -> QuillClientResult<Post> {
        Self::execute_json(self.request(
            Method::POST,
            &format!("/api/posts/{uuid}/like"),
            Some(token),
        ))
        .await
    }

    /// Добавляет блок в конец поста.
    pub async fn append_paragraph(
        &self,
        token: &str,
        post_uuid: Uuid,
        paragraph: &NewParagraph,
    ) -> QuillClientResult<Paragraph> {
        Self::execute_json(
            self.request(
                Method::POST,
                &format!("/api/posts/{post_uuid}/paragraphs"),
                Some(token),
            )
            .json(paragraph),
        )
        .await
    }

    /// Удаляет блок содержимого.
    pub async fn delete_paragraph(&self, token: &str, uuid: Uuid) -> QuillClientResult<()> {
        Self::execute(self.request(
            Method::DELETE,
            &format!("/api/paragraphs/{uuid}"),
            Some(token),
        ))
        .await?;
        Ok(())
    }

    /// Возвращает публичный профиль пользователя.
    pub async fn get_user(&self, uuid: Uuid) -> QuillClientResult<User> {
        Self::execute_json(self.request(Method::GET, &format!("/api/users/{uuid}"), None)).await
    }

    /// Возвращает посты владельца токена.
    pub async fn my_posts(&self, token: &str) -> QuillClientResult<Vec<Post>> {
        Self::execute_json(self.request(Method::GET, "/api/users/me/posts", Some(token))).await
    }

    /// Возвращает темы владельца токена.
    pub async fn my_topics(&self, token: &str) -> QuillClientResult<Vec<Topic>> {
        Self::execute_json(self.request(Method::GET, "/api/users/me/topics", Some(token))).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;

    fn client() -> HttpClient {
        HttpClient::new("http://localhost:8080/").expect("client must build")
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let full = client().endpoint("/api/posts");
        assert_eq!(full, "http://localhost:8080/api/posts");
    }

    #[test]
    fn list_query_omits_unset_parameters() {
        let request = client()
            .list_posts_request(&PostListQuery::default())
            .build()
            .expect("request must build");
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/posts");
    }

    #[test]
    fn list_query_carries_cursor_direction_and_topic() {
        let query = PostListQuery {
            cursor: Some(15),
            recent: true,
            topic: Some("tech".to_string()),
        };
        let request = client()
            .list_posts_request(&query)
            .build()
            .expect("request must build");
        assert_eq!(
            request.url().query(),
            Some("cursor=15&recent=true&topic=tech")
        );
    }

    #[test]
    fn token_becomes_bearer_header() {
        let request = client()
            .request(Method::GET, "/api/auth/check", Some("abc"))
            .build()
            .expect("request must build");
        assert_eq!(
            request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer abc")
        );
    }
}
