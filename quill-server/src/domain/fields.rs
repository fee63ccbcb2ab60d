use super::error::DomainError;

pub(crate) const TITLE_MAX_LEN: usize = 255;
pub(crate) const DESCRIPTION_MAX_LEN: usize = 2000;
pub(crate) const SLUG_MAX_LEN: usize = 64;

pub(crate) fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

pub(crate) fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

pub(crate) fn normalize_description(description: &str) -> Result<String, DomainError> {
    let description = description.trim();
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(DomainError::Validation {
            field: "description",
            message: "must be at most 2000 chars",
        });
    }
    Ok(description.to_string())
}

/// Lowercase ASCII letters, digits and single dashes, no leading/trailing dash.
pub(crate) fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub(crate) fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

pub(crate) fn normalize_slug(raw: &str) -> Result<String, DomainError> {
    let slug = raw.trim().to_ascii_lowercase();
    if !is_valid_slug(&slug) {
        return Err(DomainError::Validation {
            field: "url",
            message: "must be 1..64 chars of [a-z0-9-]",
        });
    }
    Ok(slug)
}
