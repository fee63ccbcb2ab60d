use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthDto {
    pub(crate) status: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthDto)
    )
)]
pub(crate) async fn healthz() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}
