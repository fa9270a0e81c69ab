//! 捐赠项目处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::model::{CreateProjectRequest, ProjectQuery, ProjectView, UpdateProjectRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ok, ApiResponse, ApiResult};
use crate::metrics::DonorSummary;

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Vec<ProjectView>> {
    ok(state.project_service.list_projects(query.filter))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProjectView> {
    ok(state.project_service.get_project(id)?)
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<ProjectView> {
    let project = state.project_service.create_project(payload)?;
    Ok(ApiResponse::created(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult<ProjectView> {
    ok(state.project_service.update_project(id, payload)?)
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CoreError> {
    state.project_service.delete_project(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn project_summary(State(state): State<AppState>) -> ApiResult<DonorSummary> {
    ok(state.project_service.summary())
}
