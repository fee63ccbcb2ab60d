use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::like_ledger::LikeLedger;
use crate::application::topic_catalog::TopicCatalog;
use crate::data::post_repository::TitleMatch;
use crate::data::repositories::Repositories;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) blog_service: Arc<BlogService>,
    pub(crate) topic_catalog: Arc<TopicCatalog>,
    pub(crate) like_ledger: Arc<LikeLedger>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(repos: Repositories, jwt: Arc<JwtService>, title_match: TitleMatch) -> Self {
        let topic_catalog = Arc::new(TopicCatalog::new(repos.topics));
        let auth_service = Arc::new(AuthService::new(repos.users.clone(), jwt.clone()));
        let blog_service = Arc::new(BlogService::new(
            repos.posts.clone(),
            repos.paragraphs,
            repos.users,
            topic_catalog.clone(),
            title_match,
        ));
        let like_ledger = Arc::new(LikeLedger::new(repos.posts, repos.likes));

        Self {
            auth_service,
            blog_service,
            topic_catalog,
            like_ledger,
            jwt,
        }
    }
}
