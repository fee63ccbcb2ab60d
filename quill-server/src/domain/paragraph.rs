use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::DomainError;
use super::fields::validate_positive_i64;

const KIND_MAX_LEN: usize = 32;
const CONTENT_MAX_LEN: usize = 100_000;

/// A block of post content. `kind` is a free-form tag ("text", "image",
/// "code", ...), serialized as `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Paragraph {
    pub(crate) id: i64,
    pub(crate) uuid: Uuid,
    pub(crate) post_id: i64,
    pub(crate) kind: String,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Paragraph {
    pub(crate) fn new(
        id: i64,
        uuid: Uuid,
        post_id: i64,
        kind: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("post_id", post_id)?;
        let draft = ParagraphDraft {
            kind: kind.into(),
            content: content.into(),
        }
        .validate()?;

        Ok(Self {
            id,
            uuid,
            post_id,
            kind: draft.kind,
            content: draft.content,
            created_at,
        })
    }
}

/// Paragraph content as supplied by the author, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParagraphDraft {
    pub(crate) kind: String,
    pub(crate) content: String,
}

impl ParagraphDraft {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let kind = self.kind.trim();
        if kind.is_empty() || kind.chars().count() > KIND_MAX_LEN {
            return Err(DomainError::Validation {
                field: "type",
                message: "must be 1..32 chars",
            });
        }
        if self.content.chars().count() > CONTENT_MAX_LEN {
            return Err(DomainError::Validation {
                field: "content",
                message: "must be at most 100000 chars",
            });
        }

        Ok(Self {
            kind: kind.to_string(),
            content: self.content,
        })
    }
}
