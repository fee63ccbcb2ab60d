pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod paragraphs;
pub(crate) mod posts;
pub(crate) mod topics;
pub(crate) mod users;
