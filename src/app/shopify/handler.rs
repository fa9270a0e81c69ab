//! Shopify 处理器

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use serde_json::{json, Value};

use super::gateway::DEFAULT_ORDERS_LIMIT;
use super::model::{
    CallbackQuery, ConnectRequest, EnvCheck, OrdersQuery, ShopQuery, StoreConnection,
};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{ok, ApiResult};

fn require_shop(shop: Option<String>) -> Result<String, CoreError> {
    shop.filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CoreError::BadRequest("Shop parameter is required".to_string()))
}

pub async fn begin_auth(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Redirect, CoreError> {
    let shop = require_shop(query.shop)?;
    let url = state
        .shopify_gateway
        .begin_auth(&shop)
        .map_err(|e| CoreError::from_gateway(e, "initiate Shopify authentication"))?;
    Ok(Redirect::to(url.as_str()))
}

pub async fn auth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, CoreError> {
    let (Some(shop), Some(code)) = (query.shop, query.code) else {
        return Err(CoreError::BadRequest(
            "Missing required parameters".to_string(),
        ));
    };

    let redirect = state
        .shopify_gateway
        .complete_auth(&shop, &code, query.state.as_deref())
        .await
        .map_err(|e| CoreError::from_gateway(e, "complete Shopify authentication"))?;
    Ok(Redirect::to(&redirect))
}

pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Json<Value>, CoreError> {
    let shop = require_shop(query.shop)?;
    let products = state
        .shopify_gateway
        .products(&shop)
        .await
        .map_err(|e| CoreError::from_gateway(e, "fetch products"))?;
    Ok(Json(json!({ "products": products })))
}

pub async fn orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, CoreError> {
    let shop = require_shop(query.shop)?;
    let limit = query.limit.unwrap_or(DEFAULT_ORDERS_LIMIT);
    let orders = state
        .shopify_gateway
        .orders(&shop, limit)
        .await
        .map_err(|e| CoreError::from_gateway(e, "fetch orders"))?;
    Ok(Json(json!({ "orders": orders })))
}

pub async fn get_connection(State(state): State<AppState>) -> ApiResult<StoreConnection> {
    ok(state.connection_service.current()?)
}

pub async fn connect_store(
    State(state): State<AppState>,
    Json(payload): Json<ConnectRequest>,
) -> ApiResult<StoreConnection> {
    ok(state.connection_service.connect(&payload.store_url).await?)
}

pub async fn disconnect_store(State(state): State<AppState>) -> Result<StatusCode, CoreError> {
    state.connection_service.disconnect()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn env_check(State(state): State<AppState>) -> Json<EnvCheck> {
    let config = state.shopify_gateway.config();
    Json(EnvCheck {
        has_shopify_api_key: !config.api_key.is_empty(),
        has_shopify_api_secret: !config.api_secret.is_empty(),
        shopify_app_host_name: Some(config.app_url.clone()).filter(|u| !u.is_empty()),
    })
}
