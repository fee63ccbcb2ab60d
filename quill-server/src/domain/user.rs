use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;
use super::fields::{slugify, validate_positive_i64};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_register_username(&self.username)?;
        validate_new_password(&self.password)?;
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..64 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) username: String,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            username: normalize_register_username(&self.username)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ChangePasswordRequest {
    pub(crate) current_password: String,
    pub(crate) new_password: String,
}

impl ChangePasswordRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.current_password.is_empty() {
            return Err(DomainError::Validation {
                field: "current_password",
                message: "must not be empty",
            });
        }
        validate_new_password(&self.new_password)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) uuid: Uuid,
    pub(crate) username: String,
    pub(crate) url: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        uuid: Uuid,
        username: impl Into<String>,
        url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        let username = normalize_register_username(&username.into())?;
        let url = url.into();
        if url.is_empty() {
            return Err(DomainError::Validation {
                field: "url",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            uuid,
            username,
            url,
            created_at,
        })
    }
}

/// Public profile slug. Falls back to a uuid-derived slug when the username
/// has no ASCII alphanumerics.
pub(crate) fn profile_url(username: &str, uuid: Uuid) -> String {
    let slug = slugify(username);
    if slug.is_empty() {
        return format!("user-{}", uuid.simple());
    }
    slug
}

fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(3..=64).contains(&len) {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    Ok(username.to_string())
}

fn validate_new_password(password: &str) -> Result<(), DomainError> {
    let password_len = password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 8..128 chars",
        });
    }
    Ok(())
}
