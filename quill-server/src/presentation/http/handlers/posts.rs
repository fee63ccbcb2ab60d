use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::auth::UserDto;
use super::paragraphs::{ParagraphDto, ParagraphInputDto};
use crate::application::blog_service::{PostDetail, PostView};
use crate::domain::error::DomainError;
use crate::domain::like::LikeOutcome;
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    /// Topic slug; the topic must already exist.
    #[validate(length(min = 1, max = 64))]
    pub(crate) topic: String,
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub(crate) description: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub(crate) image_url: String,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) paragraphs: Vec<ParagraphInputDto>,
}

/// Full replacement of the editable fields; each one must be present.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(required, length(max = 2000))]
    pub(crate) description: Option<String>,
    #[validate(required)]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ListPostsQuery {
    /// Id of the last post seen.
    pub(crate) cursor: Option<i64>,
    /// With a cursor: return posts newer than it instead of older.
    /// Accepts `1`/`0` as well as `true`/`false`.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub(crate) recent: bool,
    /// Topic slug; when present the cursor is ignored.
    pub(crate) topic: Option<String>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
        Some(value) => Err(de::Error::invalid_value(
            de::Unexpected::Str(value),
            &"1, 0, true or false",
        )),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SearchQuery {
    /// Substring to look for in post titles.
    pub(crate) q: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) title: String,
    pub(crate) likes: i64,
    pub(crate) description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) user: Option<UserDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) image_url: String,
    pub(crate) uuid: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) paragraphs: Vec<ParagraphDto>,
}

impl From<PostView> for PostDto {
    fn from(view: PostView) -> Self {
        let post = view.post;
        Self {
            id: post.id,
            text: post.text,
            title: post.title,
            likes: post.likes,
            description: post.description,
            user: view.author.map(UserDto::from),
            created_at: post.created_at,
            image_url: post.image_url,
            uuid: post.uuid,
        }
    }
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.view.into(),
            paragraphs: detail.paragraphs.into_iter().map(ParagraphDto::from).collect(),
        }
    }
}

fn post_list(views: Vec<PostView>) -> Json<Vec<PostDto>> {
    Json(views.into_iter().map(PostDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Up to 10 posts, newest first", body = [PostDto]),
        (status = 404, description = "Topic not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    let views = state
        .blog_service
        .list_posts(query.topic.as_deref(), query.cursor, query.recent)
        .await?;
    Ok(post_list(views))
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    tag = "posts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Posts whose title contains the query, newest first", body = [PostDto]),
        (status = 400, description = "Empty query", body = ErrorBody)
    )
)]
pub(crate) async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    let views = state.blog_service.search_posts(&query.q).await?;
    Ok(post_list(views))
}

#[utoipa::path(
    get,
    path = "/api/posts/{uuid}",
    tag = "posts",
    params(
        ("uuid" = Uuid, Path, description = "Post uuid")
    ),
    responses(
        (status = 200, description = "Post with its paragraphs", body = PostDetailDto),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<PostDetailDto>> {
    let detail = state.blog_service.get_post(uuid).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDetailDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Topic not found", body = ErrorBody)
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDetailDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        topic: dto.topic,
        title: dto.title,
        description: dto.description,
        image_url: dto.image_url,
        paragraphs: dto.paragraphs.into_iter().map(Into::into).collect(),
    };

    let detail = state.blog_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{uuid}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("uuid" = Uuid, Path, description = "Post uuid")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error or missing field", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the post owner", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        description: dto.description.unwrap_or_default(),
        text: dto.text.unwrap_or_default(),
    };

    let view = state
        .blog_service
        .update_post(auth.user_id, uuid, req)
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{uuid}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("uuid" = Uuid, Path, description = "Post uuid")
    ),
    responses(
        (status = 204, description = "Post and its paragraphs and likes deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the post owner", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(auth.user_id, uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{uuid}/like",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("uuid" = Uuid, Path, description = "Post uuid")
    ),
    responses(
        (status = 200, description = "Like recorded", body = PostDto),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 409, description = "Already liked by this user", body = ErrorBody)
    )
)]
pub(crate) async fn like_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<PostDto>> {
    match state.like_ledger.record_like(auth.user_id, uuid).await? {
        LikeOutcome::Accepted(post) => {
            let view = state.blog_service.view(post).await?;
            Ok(Json(view.into()))
        }
        LikeOutcome::AlreadyLiked => Err(DomainError::AlreadyLiked.into()),
    }
}
