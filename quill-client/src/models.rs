use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Публичный идентификатор пользователя.
    pub uuid: Uuid,
    /// Отображаемое имя.
    pub username: String,
    /// Slug профиля, производный от имени.
    pub url: String,
    /// Дата и время регистрации (UTC).
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации, входа или смены имени.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Тема (раздел) блога.
pub struct Topic {
    /// Название темы.
    pub title: String,
    /// Описание темы.
    pub description: String,
    /// Публичный идентификатор темы.
    pub uuid: Uuid,
    /// Slug темы, используемый в запросах.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Блок содержимого поста.
pub struct Paragraph {
    /// Тип блока ("text", "code", "image", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Содержимое блока.
    pub content: String,
    /// Публичный идентификатор блока.
    pub uuid: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста без блоков содержимого.
pub struct Post {
    /// Числовой идентификатор, используется как курсор пагинации.
    pub id: i64,
    /// Основной текст поста.
    pub text: String,
    /// Заголовок поста.
    pub title: String,
    /// Количество лайков.
    pub likes: i64,
    /// Краткое описание.
    pub description: String,
    /// Автор; отсутствует, если автор не найден.
    #[serde(default)]
    pub user: Option<User>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Ссылка на обложку.
    pub image_url: String,
    /// Публичный идентификатор поста.
    pub uuid: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пост вместе с блоками содержимого.
pub struct PostDetail {
    /// Поля поста.
    #[serde(flatten)]
    pub post: Post,
    /// Блоки содержимого в порядке добавления.
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Serialize)]
/// Новый блок содержимого.
pub struct NewParagraph {
    /// Тип блока.
    #[serde(rename = "type")]
    pub kind: String,
    /// Содержимое блока.
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные для создания поста.
pub struct NewPost {
    /// Slug существующей темы.
    pub topic: String,
    /// Заголовок поста.
    pub title: String,
    /// Краткое описание.
    pub description: String,
    /// Ссылка на обложку.
    pub image_url: String,
    /// Начальные блоки содержимого.
    pub paragraphs: Vec<NewParagraph>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Новые значения редактируемых полей поста.
pub struct PostUpdate {
    /// Заголовок поста.
    pub title: String,
    /// Краткое описание.
    pub description: String,
    /// Основной текст.
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Параметры ленты постов.
///
/// Без курсора возвращается самая свежая страница. С курсором возвращаются
/// посты старше курсора, а при `recent = true` новее него. Фильтр по теме
/// игнорирует курсор.
pub struct PostListQuery {
    /// Идентификатор поста, от которого отсчитывается страница.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<i64>,
    /// Листать к более новым постам.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub recent: bool,
    /// Slug темы.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Paragraph, PostDetail};

    #[test]
    fn post_detail_reads_flattened_post_fields() {
        let raw = r#"{
            "id": 7,
            "text": "",
            "title": "Hello",
            "likes": 2,
            "description": "d",
            "created_at": "2024-01-01T00:00:00Z",
            "image_url": "",
            "uuid": "6a2f41a3-c54c-fce8-32d2-0324e1c32e22",
            "paragraphs": [
                {"type": "code", "content": "fn main() {}", "uuid": "6a2f41a3-c54c-fce8-32d2-0324e1c32e23"}
            ]
        }"#;

        let detail: PostDetail = serde_json::from_str(raw).expect("detail must parse");
        assert_eq!(detail.post.id, 7);
        assert!(detail.post.user.is_none());
        assert_eq!(detail.paragraphs[0].kind, "code");
    }

    #[test]
    fn paragraph_kind_is_serialized_as_type() {
        let paragraph = Paragraph {
            kind: "text".to_string(),
            content: "hi".to_string(),
            uuid: uuid::Uuid::nil(),
        };
        let value = serde_json::to_value(paragraph).expect("paragraph must serialize");
        assert_eq!(value["type"], "text");
        assert!(value.get("kind").is_none());
    }
}
