use axum::Router;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::health::healthz;

pub(crate) mod auth;
pub(crate) mod paragraphs;
pub(crate) mod posts;
pub(crate) mod topics;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/healthz", get(healthz))
        .nest("/api/auth", auth::router(state.clone()))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/paragraphs", paragraphs::router(state.clone()))
        .nest("/api/topics", topics::router(state.clone()))
        .nest("/api/users", users::router(state))
}
