use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::topic::{CreateTopicRequest, Topic};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateTopicDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub(crate) description: String,
    /// Slug; derived from the title when omitted.
    #[validate(length(min = 1, max = 64))]
    pub(crate) url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TopicDto {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) uuid: Uuid,
    pub(crate) url: String,
}

impl From<Topic> for TopicDto {
    fn from(topic: Topic) -> Self {
        Self {
            title: topic.title,
            description: topic.description,
            uuid: topic.uuid,
            url: topic.url,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/topics",
    tag = "topics",
    responses(
        (status = 200, description = "All topics ordered by title", body = [TopicDto]),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn list_topics(State(state): State<AppState>) -> AppResult<Json<Vec<TopicDto>>> {
    let topics = state.topic_catalog.list_topics().await?;
    Ok(Json(topics.into_iter().map(TopicDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/topics/{url}",
    tag = "topics",
    params(
        ("url" = String, Path, description = "Topic slug")
    ),
    responses(
        (status = 200, description = "Topic found", body = TopicDto),
        (status = 404, description = "Topic not found", body = ErrorBody)
    )
)]
pub(crate) async fn get_topic(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> AppResult<Json<TopicDto>> {
    let topic = state.topic_catalog.get_topic(&url).await?;
    Ok(Json(topic.into()))
}

#[utoipa::path(
    post,
    path = "/api/topics",
    tag = "topics",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateTopicDto,
    responses(
        (status = 201, description = "Topic created", body = TopicDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Slug already taken", body = ErrorBody)
    )
)]
pub(crate) async fn create_topic(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreateTopicDto>,
) -> AppResult<(StatusCode, Json<TopicDto>)> {
    dto.validate()?;

    let req = CreateTopicRequest {
        title: dto.title,
        description: dto.description,
        url: dto.url,
    };

    let topic = state.topic_catalog.create_topic(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(topic.into())))
}
