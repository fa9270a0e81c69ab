//! 派生指标计算
//!
//! 全部是纯函数。除组合汇总外不对零分母做保护：`goal = 0` 或
//! `invested = 0` 时结果为 `inf`/`NaN`，由调用方决定如何展示。

use serde::Serialize;

use crate::app::investments::model::{Investment, InvestmentStatus};
use crate::app::projects::model::{Project, ProjectStatus};

/// 募资进度
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingProgress {
    /// 百分比，`raised / goal × 100`
    pub progress: f64,
    pub remaining: f64,
}

/// 投资收益
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentGain {
    pub gain: f64,
    pub gain_percent: f64,
}

/// ROI 计算器的预测结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjection {
    pub monthly_return: f64,
    pub total_return: f64,
    pub final_amount: f64,
}

/// 捐赠方汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub total_donated: f64,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_donors: u64,
}

/// 投资组合汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub total_value: f64,
    pub total_gain: f64,
    pub total_roi: f64,
    pub active_investments: usize,
    pub average_roi: f64,
}

pub fn funding_progress(raised: f64, goal: f64) -> FundingProgress {
    FundingProgress {
        progress: raised / goal * 100.0,
        remaining: goal - raised,
    }
}

pub fn investment_gain(invested: f64, current_value: f64) -> InvestmentGain {
    let gain = current_value - invested;
    InvestmentGain {
        gain,
        gain_percent: gain / invested * 100.0,
    }
}

/// 编辑投资时重新计算 ROI：两个金额都为正才重算，否则沿用原值
pub fn recalculated_roi(invested: f64, current_value: f64, previous_roi: f64) -> f64 {
    if invested > 0.0 && current_value > 0.0 {
        investment_gain(invested, current_value).gain_percent
    } else {
        previous_roi
    }
}

/// 按年化收益率和月数估算收益
pub fn roi_projection(investment: f64, annual_rate: f64, months: f64) -> RoiProjection {
    let yearly_return = investment * annual_rate / 100.0;
    let monthly_return = yearly_return / 12.0;
    let total_return = monthly_return * months;

    RoiProjection {
        monthly_return,
        total_return,
        final_amount: investment + total_return,
    }
}

pub fn donor_summary(projects: &[Project]) -> DonorSummary {
    DonorSummary {
        total_donated: projects.iter().map(|p| p.raised).sum(),
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count(),
        completed_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count(),
        total_donors: projects.iter().map(|p| u64::from(p.donors)).sum(),
    }
}

pub fn portfolio_summary(investments: &[Investment]) -> PortfolioSummary {
    let total_invested: f64 = investments.iter().map(|i| i.invested).sum();
    let total_value: f64 = investments.iter().map(Investment::effective_value).sum();
    let total_gain = total_value - total_invested;
    let total_roi = if total_invested > 0.0 {
        total_gain / total_invested * 100.0
    } else {
        0.0
    };
    let average_roi = if investments.is_empty() {
        0.0
    } else {
        investments.iter().map(|i| i.roi).sum::<f64>() / investments.len() as f64
    };

    PortfolioSummary {
        total_invested,
        total_value,
        total_gain,
        total_roi,
        active_investments: investments
            .iter()
            .filter(|i| i.status == InvestmentStatus::Active)
            .count(),
        average_roi,
    }
}
