pub(crate) mod like_repository;
pub(crate) mod paragraph_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod topic_repository;
pub(crate) mod user_repository;
