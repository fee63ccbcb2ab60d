use super::error::DomainError;

/// Only the owner of a post (and therefore of its paragraphs) may mutate it.
pub(crate) fn authorize_owner(owner_id: i64, actor_user_id: i64) -> Result<(), DomainError> {
    if owner_id != actor_user_id {
        return Err(DomainError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DomainError, authorize_owner};

    #[test]
    fn owner_is_allowed() {
        assert!(authorize_owner(7, 7).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        let err = authorize_owner(7, 8).expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }
}
