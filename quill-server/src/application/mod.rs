pub(crate) mod auth_service;
pub(crate) mod blog_service;
pub(crate) mod like_ledger;
pub(crate) mod topic_catalog;
