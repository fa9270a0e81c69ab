//! 投资业务服务

use std::sync::Arc;

use tracing::info;

use super::model::{
    CreateInvestmentRequest, Investment, InvestmentFilter, InvestmentStatus, InvestmentView,
    UpdateInvestmentRequest,
};
use crate::app::catalog::{category_icon, ItemKind};
use crate::app::store::ItemStore;
use crate::core::error::CoreError;
use crate::metrics::{self, PortfolioSummary};

#[derive(Clone)]
pub struct InvestmentService {
    store: Arc<ItemStore<Investment>>,
}

impl InvestmentService {
    pub fn new(store: Arc<ItemStore<Investment>>) -> Self {
        Self { store }
    }

    pub fn list_investments(&self, filter: InvestmentFilter) -> Vec<InvestmentView> {
        self.store
            .list()
            .into_iter()
            .filter(|i| filter.matches(i))
            .map(InvestmentView::from)
            .collect()
    }

    pub fn find(&self, id: i64) -> Option<InvestmentView> {
        self.store.get(id).map(InvestmentView::from)
    }

    pub fn get_investment(&self, id: i64) -> Result<InvestmentView, CoreError> {
        self.find(id)
            .ok_or_else(|| CoreError::NotFound(format!("Investment {} not found", id)))
    }

    /// 新投资的当前价值等于投入，ROI 从 0 开始
    pub fn create_investment(
        &self,
        req: CreateInvestmentRequest,
    ) -> Result<InvestmentView, CoreError> {
        let investment = Investment {
            id: 0,
            icon: category_icon(ItemKind::Investor, &req.category),
            title: req.title,
            description: req.description,
            category: req.category,
            invested: req.goal,
            current_value: req.goal,
            roi: 0.0,
            status: InvestmentStatus::Active,
            risk: req.risk,
            duration: format!("{} months", req.duration),
            project_goal: None,
            total_invested: None,
            shopify_store_url: req.shopify_store.filter(|s| !s.trim().is_empty()),
        };

        let created = self.store.create(investment)?;
        info!(id = created.id, title = %created.title, "投资已创建");
        Ok(created.into())
    }

    /// 编辑投资并按新的投入和当前价值重算 ROI
    pub fn update_investment(
        &self,
        id: i64,
        req: UpdateInvestmentRequest,
    ) -> Result<InvestmentView, CoreError> {
        let updated = self.store.update(id, |investment| {
            let entered_value = req.current_value.unwrap_or(0.0);
            investment.roi = metrics::recalculated_roi(req.invested, entered_value, investment.roi);
            investment.current_value = if entered_value != 0.0 {
                entered_value
            } else {
                req.invested
            };
            investment.invested = req.invested;
            investment.title = req.title;
            investment.description = req.description;
            investment.category = req.category;
            investment.risk = req.risk;
            investment.duration = req.duration;
            investment.shopify_store_url = req.shopify_store_url.filter(|s| !s.is_empty());
        })?;

        let updated =
            updated.ok_or_else(|| CoreError::NotFound(format!("Investment {} not found", id)))?;
        info!(id, roi = updated.roi, "投资已更新");
        Ok(updated.into())
    }

    pub fn delete_investment(&self, id: i64) -> Result<(), CoreError> {
        if self.store.delete(id)? {
            info!(id, "投资已删除");
            Ok(())
        } else {
            Err(CoreError::NotFound(format!("Investment {} not found", id)))
        }
    }

    pub fn summary(&self) -> PortfolioSummary {
        metrics::portfolio_summary(&self.store.list())
    }
}
