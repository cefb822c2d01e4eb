use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::assessment_dto::{AssessmentListQuery, AssessmentListResponse, AssessmentResponse},
    error::Result,
    models::caller::CallerContext,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/assessments",
    params(
        ("status" = Option<String>, Query, description = "Filter by display status"),
        ("institution_id" = Option<String>, Query, description = "Filter by targeted institution"),
        ("kind" = Option<String>, Query, description = "assessment, course or assignment")
    ),
    responses(
        (status = 200, description = "Visible assessments with derived status", body = Json<AssessmentListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<AssessmentListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.assessment_service.list(&caller, &query)?;
    let total = items.len();
    Ok(Json(AssessmentListResponse { items, total }))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assessment ID")
    ),
    responses(
        (status = 200, description = "Assessment found", body = Json<AssessmentResponse>),
        (status = 404, description = "Assessment not found")
    )
)]
#[axum::debug_handler]
pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assessment = state.assessment_service.get(&caller, id)?;
    Ok(Json(assessment))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Assessment ID")
    ),
    responses(
        (status = 200, description = "Derived status"),
        (status = 404, description = "Assessment not found"),
        (status = 500, description = "Assessment has no schedule")
    )
)]
#[axum::debug_handler]
pub async fn get_assessment_status(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let status = state.assessment_service.status(&caller, id)?;
    Ok(Json(json!({ "id": id, "status": status })))
}
