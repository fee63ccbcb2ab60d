use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::paragraphs::append_paragraph;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, like_post, list_posts, search_posts, update_post,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/search", get(search_posts))
        .route("/{uuid}", get(get_post));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{uuid}", patch(update_post).delete(delete_post))
        .route("/{uuid}/like", post(like_post))
        .route("/{uuid}/paragraphs", post(append_paragraph))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
