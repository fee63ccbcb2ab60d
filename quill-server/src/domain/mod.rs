pub(crate) mod error;
pub(crate) mod fields;
pub(crate) mod like;
pub(crate) mod ownership;
pub(crate) mod pagination;
pub(crate) mod paragraph;
pub(crate) mod post;
pub(crate) mod topic;
pub(crate) mod user;
