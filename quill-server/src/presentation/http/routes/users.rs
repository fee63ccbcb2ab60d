use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{get_user, my_posts, my_topics};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/{uuid}", get(get_user));

    let protected = Router::new()
        .route("/me/posts", get(my_posts))
        .route("/me/topics", get(my_topics))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
