//! 捐赠项目数据模型

use serde::{Deserialize, Serialize};

use crate::app::catalog::{self, Icon, ImpactLevel, RiskLevel};
use crate::app::store::FundableItem;
use crate::metrics::{self, FundingProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    NearlyComplete,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(
        rename = "iconName",
        serialize_with = "catalog::serialize_icon",
        deserialize_with = "catalog::deserialize_donor_icon",
        default = "catalog::default_donor_icon"
    )]
    pub icon: Icon,
    pub goal: f64,
    #[serde(default)]
    pub raised: f64,
    #[serde(default)]
    pub donors: u32,
    #[serde(default)]
    pub days_left: i64,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify_store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify_store_url: Option<String>,
}

impl Project {
    pub fn progress(&self) -> FundingProgress {
        metrics::funding_progress(self.raised, self.goal)
    }
}

impl FundableItem for Project {
    const STORAGE_KEY: &'static str = "donor-projects";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn seeds() -> Vec<Self> {
        seed_projects()
    }
}

/// 项目卡片：记录加上派生指标
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub metrics: FundingProgress,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        let metrics = project.progress();
        Self { project, metrics }
    }
}

/// 列表过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ProjectFilter {
    pub fn matches(self, project: &Project) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Active => project.status == ProjectStatus::Active,
            ProjectFilter::Completed => project.status == ProjectStatus::Completed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub filter: ProjectFilter,
}

/// 创建项目请求，`duration` 为剩余天数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal: f64,
    pub duration: i64,
    #[serde(default)]
    pub impact: Option<ImpactLevel>,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub shopify_store: Option<String>,
}

/// 编辑项目请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal: f64,
    #[serde(default)]
    pub shopify_store_url: Option<String>,
}

pub fn seed_projects() -> Vec<Project> {
    vec![
        Project {
            id: 1,
            title: "Education Fund".to_string(),
            description: "Supporting local schools with technology and resources".to_string(),
            category: "Education".to_string(),
            icon: Icon::BookOpen,
            goal: 50_000.0,
            raised: 37_500.0,
            donors: 234,
            days_left: 15,
            status: ProjectStatus::Active,
            impact: Some(ImpactLevel::High),
            risk: None,
            shopify_store: None,
            shopify_store_url: None,
        },
        Project {
            id: 2,
            title: "Healthcare Initiative".to_string(),
            description: "Providing medical care to underserved communities".to_string(),
            category: "Health".to_string(),
            icon: Icon::Heart,
            goal: 75_000.0,
            raised: 68_000.0,
            donors: 189,
            days_left: 8,
            status: ProjectStatus::NearlyComplete,
            impact: Some(ImpactLevel::Critical),
            risk: None,
            shopify_store: None,
            shopify_store_url: None,
        },
        Project {
            id: 3,
            title: "Community Development".to_string(),
            description: "Building infrastructure and community centers".to_string(),
            category: "Infrastructure".to_string(),
            icon: Icon::Home,
            goal: 100_000.0,
            raised: 25_000.0,
            donors: 156,
            days_left: 45,
            status: ProjectStatus::Active,
            impact: Some(ImpactLevel::Medium),
            risk: None,
            shopify_store: None,
            shopify_store_url: None,
        },
    ]
}
