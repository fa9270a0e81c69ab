//! 投资处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::model::{
    CreateInvestmentRequest, InvestmentQuery, InvestmentView, UpdateInvestmentRequest,
};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ok, ApiResponse, ApiResult};
use crate::metrics::PortfolioSummary;

pub async fn list_investments(
    State(state): State<AppState>,
    Query(query): Query<InvestmentQuery>,
) -> ApiResult<Vec<InvestmentView>> {
    ok(state.investment_service.list_investments(query.filter))
}

pub async fn get_investment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<InvestmentView> {
    ok(state.investment_service.get_investment(id)?)
}

pub async fn create_investment(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvestmentRequest>,
) -> ApiResult<InvestmentView> {
    let investment = state.investment_service.create_investment(payload)?;
    Ok(ApiResponse::created(investment))
}

/// 编辑后 ROI 会按新的投入和当前价值重算
pub async fn update_investment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInvestmentRequest>,
) -> ApiResult<InvestmentView> {
    ok(state.investment_service.update_investment(id, payload)?)
}

pub async fn delete_investment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CoreError> {
    state.investment_service.delete_investment(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn portfolio_summary(State(state): State<AppState>) -> ApiResult<PortfolioSummary> {
    ok(state.investment_service.summary())
}
