//! 应用层：状态装配和路由

pub mod catalog;
pub mod dashboard;
pub mod investments;
pub mod projects;
pub mod shopify;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::storage::LocalStorage;
use investments::service::InvestmentService;
use projects::service::ProjectService;
use shopify::gateway::ShopifyGateway;
use shopify::service::ConnectionService;
use shopify::session::MemorySessionStorage;
use store::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub project_service: ProjectService,
    pub investment_service: InvestmentService,
    pub shopify_gateway: Arc<ShopifyGateway>,
    pub connection_service: ConnectionService,
}

impl AppState {
    /// 从本地存储加载条目并装配各个服务
    pub fn new(config: &Config, storage: Arc<dyn LocalStorage>) -> Self {
        let gateway = Arc::new(ShopifyGateway::new(
            config.shopify.clone(),
            Arc::new(MemorySessionStorage::new()),
        ));

        Self {
            project_service: ProjectService::new(Arc::new(ItemStore::load(storage.clone()))),
            investment_service: InvestmentService::new(Arc::new(ItemStore::load(
                storage.clone(),
            ))),
            connection_service: ConnectionService::new(storage, gateway.clone()),
            shopify_gateway: gateway,
        }
    }
}

/// 构建完整路由
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/projects",
            get(projects::handler::list_projects).post(projects::handler::create_project),
        )
        .route("/api/projects/summary", get(projects::handler::project_summary))
        .route(
            "/api/projects/:id",
            get(projects::handler::get_project)
                .put(projects::handler::update_project)
                .delete(projects::handler::delete_project),
        )
        .route(
            "/api/investments",
            get(investments::handler::list_investments)
                .post(investments::handler::create_investment),
        )
        .route(
            "/api/investments/summary",
            get(investments::handler::portfolio_summary),
        )
        .route(
            "/api/investments/:id",
            get(investments::handler::get_investment)
                .put(investments::handler::update_investment)
                .delete(investments::handler::delete_investment),
        )
        .route("/api/items/:id", get(dashboard::find_item))
        .route("/api/calculator/roi", get(dashboard::roi_calculator))
        .route("/api/auth/shopify", get(shopify::handler::begin_auth))
        .route(
            "/api/auth/shopify/callback",
            get(shopify::handler::auth_callback),
        )
        .route("/api/shopify/products", get(shopify::handler::products))
        .route("/api/shopify/orders", get(shopify::handler::orders))
        .route(
            "/api/shopify/connection",
            get(shopify::handler::get_connection)
                .post(shopify::handler::connect_store)
                .delete(shopify::handler::disconnect_store),
        )
        .route("/api/env-check", get(shopify::handler::env_check))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
