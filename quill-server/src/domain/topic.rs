use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DomainError;
use super::fields::{
    is_valid_slug, normalize_description, normalize_slug, normalize_title, slugify,
    validate_positive_i64,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Topic {
    pub(crate) id: i64,
    pub(crate) uuid: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) url: String,
    pub(crate) owner_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

impl Topic {
    pub(crate) fn new(
        id: i64,
        uuid: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        owner_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("owner_id", owner_id)?;
        let title = normalize_title(&title.into())?;
        let description = normalize_description(&description.into())?;
        let url = url.into();
        if !is_valid_slug(&url) {
            return Err(DomainError::Validation {
                field: "url",
                message: "must be 1..64 chars of [a-z0-9-]",
            });
        }

        Ok(Self {
            id,
            uuid,
            title,
            description,
            url,
            owner_id,
            created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreateTopicRequest {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) url: Option<String>,
}

impl CreateTopicRequest {
    /// Normalizes fields; when `url` is absent it is derived from the title.
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let title = normalize_title(&self.title)?;
        let description = normalize_description(&self.description)?;
        let url = match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => normalize_slug(url)?,
            _ => normalize_slug(&slugify(&title))?,
        };

        Ok(Self {
            title,
            description,
            url: Some(url),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{CreateTopicRequest, DomainError, Topic};

    #[test]
    fn create_topic_derives_url_from_title() {
        let req = CreateTopicRequest {
            title: "  Self Improvement ".to_string(),
            description: "grow".to_string(),
            url: None,
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "Self Improvement");
        assert_eq!(validated.url.as_deref(), Some("self-improvement"));
    }

    #[test]
    fn create_topic_keeps_explicit_url() {
        let req = CreateTopicRequest {
            title: "Technology".to_string(),
            description: String::new(),
            url: Some(" tech ".to_string()),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.url.as_deref(), Some("tech"));
    }

    #[test]
    fn create_topic_rejects_title_without_slug_material() {
        let req = CreateTopicRequest {
            title: "???".to_string(),
            description: String::new(),
            url: None,
        };

        let err = req.validate().expect_err("url cannot be derived");
        assert!(matches!(err, DomainError::Validation { field: "url", .. }));
    }

    #[test]
    fn topic_new_rejects_bad_slug() {
        let err = Topic::new(1, Uuid::new_v4(), "Tech", "", "Tech Stuff", 1, Utc::now())
            .expect_err("slug must be validated");
        assert!(matches!(err, DomainError::Validation { field: "url", .. }));
    }
}
