//! Shopify 转发接口的请求与响应结构

use serde::{Deserialize, Serialize};

/// 本地存储中的店铺连接键
pub const CONNECTION_STORAGE_KEY: &str = "shopify-connection";

#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub shop: Option<String>,
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub shop: Option<String>,
    pub limit: Option<u32>,
}

/// 已连接的店铺
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConnection {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub store_url: String,
}

/// 凭据是否已配置，只报告有无，不返回值
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvCheck {
    pub has_shopify_api_key: bool,
    pub has_shopify_api_secret: bool,
    pub shopify_app_host_name: Option<String>,
}
