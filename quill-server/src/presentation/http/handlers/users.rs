use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use super::auth::UserDto;
use super::posts::PostDto;
use super::topics::TopicDto;
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/users/{uuid}",
    tag = "users",
    params(
        ("uuid" = Uuid, Path, description = "User uuid")
    ),
    responses(
        (status = 200, description = "Public profile", body = UserDto),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<UserDto>> {
    let user = state.auth_service.find_user(uuid).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/me/posts",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Posts owned by the caller, newest first", body = [PostDto]),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub(crate) async fn my_posts(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<PostDto>>> {
    let views = state.blog_service.list_user_posts(auth.user_id).await?;
    Ok(Json(views.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/me/topics",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Topics created by the caller", body = [TopicDto]),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub(crate) async fn my_topics(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<TopicDto>>> {
    let topics = state.topic_catalog.list_user_topics(auth.user_id).await?;
    Ok(Json(topics.into_iter().map(TopicDto::from).collect()))
}
