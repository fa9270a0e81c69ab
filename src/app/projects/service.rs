//! 捐赠项目业务服务

use std::sync::Arc;

use tracing::info;

use super::model::{
    CreateProjectRequest, Project, ProjectFilter, ProjectStatus, ProjectView, UpdateProjectRequest,
};
use crate::app::catalog::{category_icon, ItemKind};
use crate::app::store::ItemStore;
use crate::core::error::CoreError;
use crate::metrics::{self, DonorSummary};

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<ItemStore<Project>>,
}

impl ProjectService {
    pub fn new(store: Arc<ItemStore<Project>>) -> Self {
        Self { store }
    }

    pub fn list_projects(&self, filter: ProjectFilter) -> Vec<ProjectView> {
        self.store
            .list()
            .into_iter()
            .filter(|p| filter.matches(p))
            .map(ProjectView::from)
            .collect()
    }

    pub fn find(&self, id: i64) -> Option<ProjectView> {
        self.store.get(id).map(ProjectView::from)
    }

    pub fn get_project(&self, id: i64) -> Result<ProjectView, CoreError> {
        self.find(id)
            .ok_or_else(|| CoreError::NotFound(format!("Project {} not found", id)))
    }

    pub fn create_project(&self, req: CreateProjectRequest) -> Result<ProjectView, CoreError> {
        let project = Project {
            id: 0,
            icon: category_icon(ItemKind::Donor, &req.category),
            title: req.title,
            description: req.description,
            category: req.category,
            goal: req.goal,
            raised: 0.0,
            donors: 0,
            days_left: req.duration,
            status: ProjectStatus::Active,
            impact: req.impact,
            risk: req.risk,
            shopify_store: req.shopify_store.filter(|s| !s.trim().is_empty()),
            shopify_store_url: None,
        };

        let created = self.store.create(project)?;
        info!(id = created.id, title = %created.title, "捐赠项目已创建");
        Ok(created.into())
    }

    /// 编辑只覆盖表单字段，图标、已筹金额等保持不变
    pub fn update_project(
        &self,
        id: i64,
        req: UpdateProjectRequest,
    ) -> Result<ProjectView, CoreError> {
        let updated = self.store.update(id, |project| {
            project.title = req.title;
            project.description = req.description;
            project.category = req.category;
            project.goal = req.goal;
            project.shopify_store_url = req.shopify_store_url.filter(|s| !s.is_empty());
        })?;

        let updated =
            updated.ok_or_else(|| CoreError::NotFound(format!("Project {} not found", id)))?;
        info!(id, "捐赠项目已更新");
        Ok(updated.into())
    }

    pub fn delete_project(&self, id: i64) -> Result<(), CoreError> {
        if self.store.delete(id)? {
            info!(id, "捐赠项目已删除");
            Ok(())
        } else {
            Err(CoreError::NotFound(format!("Project {} not found", id)))
        }
    }

    pub fn summary(&self) -> DonorSummary {
        metrics::donor_summary(&self.store.list())
    }
}
