use axum::Router;
use axum::middleware;
use axum::routing::delete;

use crate::presentation::AppState;
use crate::presentation::http::handlers::paragraphs::delete_paragraph;
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/{uuid}", delete(delete_paragraph))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
