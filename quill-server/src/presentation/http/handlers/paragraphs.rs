use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::paragraph::{Paragraph, ParagraphDraft};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ParagraphInputDto {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub(crate) kind: String,
    #[validate(length(max = 100000))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ParagraphDto {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) content: String,
    pub(crate) uuid: Uuid,
}

impl From<Paragraph> for ParagraphDto {
    fn from(paragraph: Paragraph) -> Self {
        Self {
            kind: paragraph.kind,
            content: paragraph.content,
            uuid: paragraph.uuid,
        }
    }
}

impl From<ParagraphInputDto> for ParagraphDraft {
    fn from(dto: ParagraphInputDto) -> Self {
        Self {
            kind: dto.kind,
            content: dto.content,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{uuid}/paragraphs",
    tag = "paragraphs",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("uuid" = Uuid, Path, description = "Post uuid")
    ),
    request_body = ParagraphInputDto,
    responses(
        (status = 201, description = "Paragraph appended at the end of the post", body = ParagraphDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the post owner", body = ErrorBody),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
pub(crate) async fn append_paragraph(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_uuid): Path<Uuid>,
    Json(dto): Json<ParagraphInputDto>,
) -> AppResult<(StatusCode, Json<ParagraphDto>)> {
    dto.validate()?;

    let paragraph = state
        .blog_service
        .append_paragraph(auth.user_id, post_uuid, dto.into())
        .await?;
    Ok((StatusCode::CREATED, Json(paragraph.into())))
}

#[utoipa::path(
    delete,
    path = "/api/paragraphs/{uuid}",
    tag = "paragraphs",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("uuid" = Uuid, Path, description = "Paragraph uuid")
    ),
    responses(
        (status = 204, description = "Paragraph deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the post owner", body = ErrorBody),
        (status = 404, description = "Paragraph not found", body = ErrorBody)
    )
)]
pub(crate) async fn delete_paragraph(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .blog_service
        .delete_paragraph(auth.user_id, uuid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
