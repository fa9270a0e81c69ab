//! 跨种类的接口：详情查找和 ROI 计算器

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::investments::model::InvestmentView;
use super::projects::model::ProjectView;
use super::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ok, ApiResult};
use crate::metrics::{self, RoiProjection};

/// 详情页的条目，带上种类标记
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum ItemDetail {
    Investor(InvestmentView),
    Donor(ProjectView),
}

/// 先查投资再查捐赠项目
pub async fn find_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ItemDetail> {
    let detail = state
        .investment_service
        .find(id)
        .map(ItemDetail::Investor)
        .or_else(|| state.project_service.find(id).map(ItemDetail::Donor))
        .ok_or_else(|| CoreError::NotFound(format!("Item {} not found", id)))?;
    ok(detail)
}

/// 计算器输入，缺省时投资额为 0、年化 15%、12 个月
#[derive(Debug, Deserialize)]
pub struct RoiQuery {
    #[serde(default)]
    pub investment: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub months: Option<f64>,
}

pub async fn roi_calculator(Query(query): Query<RoiQuery>) -> ApiResult<RoiProjection> {
    let projection = metrics::roi_projection(
        query.investment.unwrap_or(0.0),
        query.rate.unwrap_or(15.0),
        query.months.unwrap_or(12.0),
    );
    ok(projection)
}
