//! 投资数据模型

use serde::{Deserialize, Serialize};

use crate::app::catalog::{self, Icon, RiskLevel};
use crate::app::store::FundableItem;
use crate::metrics::{self, FundingProgress, InvestmentGain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentStatus {
    #[default]
    Active,
    Declining,
    Mature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(
        rename = "iconName",
        serialize_with = "catalog::serialize_icon",
        deserialize_with = "catalog::deserialize_investor_icon",
        default = "catalog::default_investor_icon"
    )]
    pub icon: Icon,
    pub invested: f64,
    #[serde(default)]
    pub current_value: f64,
    /// 百分比
    #[serde(default)]
    pub roi: f64,
    #[serde(default)]
    pub status: InvestmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub duration: String,
    /// 整个项目的募资目标
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_goal: Option<f64>,
    /// 所有投资人合计投入
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_invested: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify_store_url: Option<String>,
}

impl Investment {
    /// 当前价值，未记录（为 0）时按投入计
    pub fn effective_value(&self) -> f64 {
        if self.current_value != 0.0 {
            self.current_value
        } else {
            self.invested
        }
    }

    pub fn gain(&self) -> InvestmentGain {
        metrics::investment_gain(self.invested, self.effective_value())
    }

    /// 整个项目的募资进度，缺少目标或合计时为 `None`
    pub fn project_funding(&self) -> Option<FundingProgress> {
        match (self.total_invested, self.project_goal) {
            (Some(total), Some(goal)) => Some(metrics::funding_progress(total, goal)),
            _ => None,
        }
    }
}

impl FundableItem for Investment {
    const STORAGE_KEY: &'static str = "investor-investments";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn seeds() -> Vec<Self> {
        seed_investments()
    }

    fn merge_seed(&mut self, seed: &Self) {
        if self.project_goal.is_none() {
            self.project_goal = seed.project_goal;
        }
        if self.total_invested.is_none() {
            self.total_invested = seed.total_invested;
        }
    }
}

/// 投资卡片：记录加上收益和项目进度
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub gain: InvestmentGain,
    pub project_funding: Option<FundingProgress>,
}

impl From<Investment> for InvestmentView {
    fn from(investment: Investment) -> Self {
        let gain = investment.gain();
        let project_funding = investment.project_funding();
        Self {
            investment,
            gain,
            project_funding,
        }
    }
}

/// 表现最好的投资的 ROI 下限（不含）
pub const TOP_PERFORMER_ROI: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentFilter {
    #[default]
    All,
    Active,
    TopPerformers,
}

impl InvestmentFilter {
    pub fn matches(self, investment: &Investment) -> bool {
        match self {
            InvestmentFilter::All => true,
            InvestmentFilter::Active => investment.status == InvestmentStatus::Active,
            InvestmentFilter::TopPerformers => investment.roi > TOP_PERFORMER_ROI,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvestmentQuery {
    #[serde(default)]
    pub filter: InvestmentFilter,
}

/// 创建投资请求：`goal` 作为初始投入和当前价值，`duration` 为月数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal: f64,
    pub duration: i64,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub shopify_store: Option<String>,
}

/// 编辑投资请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub invested: f64,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    pub duration: String,
    #[serde(default)]
    pub shopify_store_url: Option<String>,
}

pub fn seed_investments() -> Vec<Investment> {
    vec![
        Investment {
            id: 1,
            title: "Tech Startup Alpha".to_string(),
            description: "AI-powered productivity platform".to_string(),
            category: "Technology".to_string(),
            icon: Icon::Smartphone,
            invested: 50_000.0,
            current_value: 62_500.0,
            roi: 25.0,
            status: InvestmentStatus::Active,
            risk: Some(RiskLevel::High),
            duration: "18 months".to_string(),
            project_goal: Some(500_000.0),
            total_invested: Some(375_000.0),
            shopify_store_url: None,
        },
        Investment {
            id: 2,
            title: "Green Energy Project".to_string(),
            description: "Solar panel manufacturing facility".to_string(),
            category: "Clean Energy".to_string(),
            icon: Icon::Leaf,
            invested: 75_000.0,
            current_value: 88_500.0,
            roi: 18.0,
            status: InvestmentStatus::Active,
            risk: Some(RiskLevel::Medium),
            duration: "24 months".to_string(),
            project_goal: Some(750_000.0),
            total_invested: Some(525_000.0),
            shopify_store_url: None,
        },
        Investment {
            id: 3,
            title: "Real Estate Fund".to_string(),
            description: "Commercial property development".to_string(),
            category: "Real Estate".to_string(),
            icon: Icon::Building2,
            invested: 100_000.0,
            current_value: 115_000.0,
            roi: 15.0,
            status: InvestmentStatus::Active,
            risk: Some(RiskLevel::Low),
            duration: "36 months".to_string(),
            project_goal: Some(1_000_000.0),
            total_invested: Some(850_000.0),
            shopify_store_url: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_records_without_project_totals_are_completed_from_seeds() {
        let raw = r#"[{"id":2,"title":"Green Energy Project","description":"Solar","category":"Clean Energy","iconName":"Leaf","invested":75000,"currentValue":90000,"roi":20,"status":"active","duration":"24 months"}]"#;
        let mut stored: Vec<Investment> = serde_json::from_str(raw).unwrap();
        stored[0].merge_seed(&seed_investments()[1]);

        assert_eq!(stored[0].current_value, 90_000.0);
        assert_eq!(stored[0].project_goal, Some(750_000.0));
        assert_eq!(stored[0].total_invested, Some(525_000.0));
    }

    #[test]
    fn missing_icon_defaults_to_smartphone() {
        let raw = r#"{"id":9,"title":"t","description":"d","category":"x","invested":100}"#;
        let investment: Investment = serde_json::from_str(raw).unwrap();
        assert_eq!(investment.icon, Icon::Smartphone);
        assert_eq!(investment.effective_value(), 100.0);
        assert_eq!(investment.gain().gain, 0.0);
    }

    #[test]
    fn top_performers_need_roi_above_fifteen() {
        let seeds = seed_investments();
        let top: Vec<i64> = seeds
            .iter()
            .filter(|i| InvestmentFilter::TopPerformers.matches(i))
            .map(|i| i.id)
            .collect();
        assert_eq!(top, vec![1, 2]);
    }

    #[test]
    fn view_includes_project_funding() {
        let view = InvestmentView::from(seed_investments().remove(0));
        assert_eq!(view.gain.gain_percent, 25.0);
        assert_eq!(view.project_funding.map(|f| f.progress), Some(75.0));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["iconName"], "Smartphone");
        assert_eq!(json["projectFunding"]["remaining"], 125_000.0);
    }
}
