use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DomainError;
use super::fields::{normalize_description, normalize_title, validate_positive_i64};
use super::paragraph::ParagraphDraft;

const IMAGE_URL_MAX_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) uuid: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) text: String,
    pub(crate) image_url: String,
    pub(crate) likes: i64,
    pub(crate) owner_id: i64,
    pub(crate) topic_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    /// Topic slug.
    pub(crate) topic: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) image_url: String,
    pub(crate) paragraphs: Vec<ParagraphDraft>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let topic = self.topic.trim().to_ascii_lowercase();
        if topic.is_empty() {
            return Err(DomainError::Validation {
                field: "topic",
                message: "must not be empty",
            });
        }

        let paragraphs = self
            .paragraphs
            .into_iter()
            .map(ParagraphDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            topic,
            title: normalize_title(&self.title)?,
            description: normalize_description(&self.description)?,
            image_url: normalize_image_url(&self.image_url)?,
            paragraphs,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) text: String,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            description: normalize_description(&self.description)?,
            text: self.text,
        })
    }
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: i64,
        uuid: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
        image_url: impl Into<String>,
        likes: i64,
        owner_id: i64,
        topic_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("owner_id", owner_id)?;
        validate_positive_i64("topic_id", topic_id)?;
        let title = normalize_title(&title.into())?;
        let description = normalize_description(&description.into())?;
        let image_url = normalize_image_url(&image_url.into())?;

        if likes < 0 {
            return Err(DomainError::Validation {
                field: "likes",
                message: "must be >= 0",
            });
        }

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            uuid,
            title,
            description,
            text: text.into(),
            image_url,
            likes,
            owner_id,
            topic_id,
            created_at,
            updated_at,
        })
    }
}

fn normalize_image_url(image_url: &str) -> Result<String, DomainError> {
    let image_url = image_url.trim();
    if image_url.len() > IMAGE_URL_MAX_LEN {
        return Err(DomainError::Validation {
            field: "image_url",
            message: "must be at most 2048 chars",
        });
    }
    Ok(image_url.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{CreatePostRequest, DomainError, Post, UpdatePostRequest};
    use crate::domain::paragraph::ParagraphDraft;

    #[test]
    fn create_post_request_validate_rejects_empty_title() {
        let req = create_request("   ", "tech", Vec::new());

        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_post_request_validate_rejects_blank_topic() {
        let req = create_request("title", "  ", Vec::new());

        let err = req.validate().expect_err("topic must be rejected");
        assert_validation_field(err, "topic");
    }

    #[test]
    fn create_post_request_validates_every_paragraph() {
        let req = create_request(
            "title",
            "tech",
            vec![
                ParagraphDraft {
                    kind: "text".to_string(),
                    content: "first".to_string(),
                },
                ParagraphDraft {
                    kind: " ".to_string(),
                    content: "second".to_string(),
                },
            ],
        );

        let err = req.validate().expect_err("second paragraph is invalid");
        assert_validation_field(err, "type");
    }

    #[test]
    fn create_post_request_validate_normalizes_fields() {
        let req = create_request(
            "  title  ",
            " Tech ",
            vec![ParagraphDraft {
                kind: " text ".to_string(),
                content: "body".to_string(),
            }],
        );

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "title");
        assert_eq!(validated.topic, "tech");
        assert_eq!(validated.paragraphs.len(), 1);
        assert_eq!(validated.paragraphs[0].kind, "text");
    }

    #[test]
    fn update_post_request_keeps_text_verbatim() {
        let req = UpdatePostRequest {
            title: " new ".to_string(),
            description: " desc ".to_string(),
            text: "  spaced text ".to_string(),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "new");
        assert_eq!(validated.description, "desc");
        assert_eq!(validated.text, "  spaced text ");
    }

    #[test]
    fn post_new_rejects_negative_likes() {
        let now = Utc::now();
        let err = Post::new(1, Uuid::new_v4(), "Title", "", "", "", -1, 10, 3, now, now)
            .expect_err("likes must be >= 0");
        assert_validation_field(err, "likes");
    }

    #[test]
    fn post_new_rejects_non_positive_owner_id() {
        let now = Utc::now();
        let err = Post::new(1, Uuid::new_v4(), "Title", "", "", "", 0, 0, 3, now, now)
            .expect_err("owner_id must be > 0");
        assert_validation_field(err, "owner_id");
    }

    #[test]
    fn post_new_rejects_updated_before_created() {
        let updated_at = Utc::now();
        let created_at = updated_at + Duration::seconds(1);

        let err = Post::new(
            1,
            Uuid::new_v4(),
            "Title",
            "",
            "",
            "",
            0,
            10,
            3,
            created_at,
            updated_at,
        )
        .expect_err("updated_at < created_at must fail");
        assert_validation_field(err, "updated_at");
    }

    fn create_request(title: &str, topic: &str, paragraphs: Vec<ParagraphDraft>) -> CreatePostRequest {
        CreatePostRequest {
            topic: topic.to_string(),
            title: title.to_string(),
            description: "description".to_string(),
            image_url: "https://example.com/cover.png".to_string(),
            paragraphs,
        }
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
