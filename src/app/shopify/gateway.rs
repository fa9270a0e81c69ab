//! Shopify OAuth 与 GraphQL 转发
//!
//! 只做请求和响应的映射：不重试、不分页、不缓存，也不校验 webhook。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::session::{SessionStorage, ShopSession};
use crate::config::ShopifyConfig;

/// 商品查询，固定取前 50 个
pub const PRODUCTS_QUERY: &str = r#"
query getProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        handle
        description
        vendor
        productType
        createdAt
        updatedAt
        images(first: 1) { edges { node { url altText } } }
        variants(first: 10) {
          edges { node { id title price compareAtPrice inventoryQuantity sku } }
        }
      }
    }
  }
}
"#;

/// 订单查询，按创建时间倒序
pub const ORDERS_QUERY: &str = r#"
query getOrders($first: Int!) {
  orders(first: $first, sortKey: CREATED_AT, reverse: true) {
    edges {
      node {
        id
        name
        createdAt
        updatedAt
        totalPrice
        subtotalPrice
        totalTax
        currencyCode
        financialStatus
        fulfillmentStatus
        customer { id firstName lastName email }
        lineItems(first: 10) {
          edges {
            node {
              id
              title
              quantity
              originalUnitPrice
              discountedUnitPrice
              variant { id title sku }
            }
          }
        }
      }
    }
  }
}
"#;

pub const PRODUCTS_PAGE_SIZE: u32 = 50;
pub const DEFAULT_ORDERS_LIMIT: u32 = 50;

const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

/// 授权 state 的有效期
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);
/// 同时等待回调的授权数上限，超出时淘汰最早的
pub const MAX_PENDING_STATES: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("无效的店铺域名: {0}")]
    InvalidShop(String),
    #[error("店铺 {0} 没有有效会话")]
    MissingSession(String),
    #[error("OAuth state 不匹配")]
    InvalidState,
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL 构造失败: {0}")]
    Url(#[from] url::ParseError),
    #[error("Shopify 返回状态 {0}: {1}")]
    Status(u16, String),
    #[error("GraphQL 错误: {0}")]
    GraphQl(String),
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    scope: String,
}

/// 规范化店铺域名：去掉协议和末尾斜杠，裸店名补全为 `*.myshopify.com`
///
/// 只接受 `*.myshopify.com` 下的单级店名，凭据不会发往其他主机。
pub fn normalize_shop(input: &str) -> Result<String, GatewayError> {
    let trimmed = input.trim().to_lowercase();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(&trimmed);
    let host = without_scheme.trim_end_matches('/');

    let shop = if host.contains('.') {
        host.to_string()
    } else {
        format!("{}.myshopify.com", host)
    };

    let valid = shop
        .strip_suffix(MYSHOPIFY_SUFFIX)
        .is_some_and(|name| {
            name.starts_with(|c: char| c.is_ascii_alphanumeric())
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !valid {
        return Err(GatewayError::InvalidShop(input.to_string()));
    }
    Ok(shop)
}

struct PendingState {
    state: String,
    issued: Instant,
}

fn prune_pending(pending: &mut HashMap<String, PendingState>, now: Instant) {
    pending.retain(|_, p| now.duration_since(p.issued) < STATE_TTL);

    while pending.len() >= MAX_PENDING_STATES {
        let oldest = pending
            .iter()
            .min_by_key(|(_, p)| p.issued)
            .map(|(shop, _)| shop.clone());
        match oldest {
            Some(shop) => {
                pending.remove(&shop);
            }
            None => break,
        }
    }
}

/// 取出 `edges[].node`，结构不符时返回空列表
pub fn edge_nodes(connection: &Value) -> Vec<Value> {
    connection["edges"]
        .as_array()
        .map(|edges| edges.iter().map(|edge| edge["node"].clone()).collect())
        .unwrap_or_default()
}

pub struct ShopifyGateway {
    client: reqwest::Client,
    config: ShopifyConfig,
    sessions: Arc<dyn SessionStorage>,
    pending_states: Mutex<HashMap<String, PendingState>>,
}

impl ShopifyGateway {
    pub fn new(config: ShopifyConfig, sessions: Arc<dyn SessionStorage>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            sessions,
            pending_states: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    fn admin_origin(&self, shop: &str) -> String {
        match &self.config.admin_origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => format!("https://{}", shop),
        }
    }

    fn app_url(&self) -> &str {
        self.config.app_url.trim_end_matches('/')
    }

    /// 生成授权地址并记录本次的 state
    pub fn begin_auth(&self, shop: &str) -> Result<Url, GatewayError> {
        let shop = normalize_shop(shop)?;
        let state = Uuid::new_v4().simple().to_string();
        let redirect_uri = format!("{}/api/auth/shopify/callback", self.app_url());

        let url = Url::parse_with_params(
            &format!("{}/admin/oauth/authorize", self.admin_origin(&shop)),
            &[
                ("client_id", self.config.api_key.as_str()),
                ("scope", self.config.scopes.join(",").as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("state", state.as_str()),
            ],
        )?;

        let now = Instant::now();
        let mut pending = self
            .pending_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        prune_pending(&mut pending, now);
        pending.insert(shop.clone(), PendingState { state, issued: now });
        drop(pending);

        info!(%shop, "开始 Shopify 授权");
        Ok(url)
    }

    /// 用授权码换取离线会话，返回安装完成后的跳转地址
    pub async fn complete_auth(
        &self,
        shop: &str,
        code: &str,
        state: Option<&str>,
    ) -> Result<String, GatewayError> {
        let shop = normalize_shop(shop)?;

        if !self.take_state(&shop, state) {
            warn!(%shop, "OAuth 回调的 state 无效");
            return Err(GatewayError::InvalidState);
        }

        let response = self
            .client
            .post(format!("{}/admin/oauth/access_token", self.admin_origin(&shop)))
            .json(&json!({
                "client_id": self.config.api_key,
                "client_secret": self.config.api_secret,
                "code": code,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(status.as_u16(), body));
        }

        let token: AccessTokenResponse = response.json().await?;
        self.sessions.store_session(ShopSession {
            id: ShopSession::offline_id(&shop),
            shop: shop.clone(),
            access_token: token.access_token,
            scope: token.scope,
        });

        info!(%shop, "Shopify 授权完成");
        Ok(format!(
            "{}/dashboard?shop={}&installed=true",
            self.app_url(),
            shop
        ))
    }

    /// state 匹配且未过期时才消费，不匹配的回调不影响进行中的授权
    fn take_state(&self, shop: &str, state: Option<&str>) -> bool {
        let mut pending = self
            .pending_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let valid = match (pending.get(shop), state) {
            (Some(expected), Some(state)) => {
                expected.state == state && expected.issued.elapsed() < STATE_TTL
            }
            _ => false,
        };
        if valid {
            pending.remove(shop);
        }
        valid
    }

    async fn graphql(&self, shop: &str, query: &str, variables: Value) -> Result<Value, GatewayError> {
        let shop = normalize_shop(shop)?;
        let session = self
            .sessions
            .load_session(&ShopSession::offline_id(&shop))
            .ok_or_else(|| GatewayError::MissingSession(shop.clone()))?;

        let endpoint = format!(
            "{}/admin/api/{}/graphql.json",
            self.admin_origin(&shop),
            self.config.api_version
        );
        debug!(%shop, %endpoint, "发送 GraphQL 查询");

        let response = self
            .client
            .post(endpoint)
            .header("X-Shopify-Access-Token", session.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(status.as_u16(), body));
        }

        let body: Value = response.json().await?;
        match body.get("errors") {
            Some(errors) if !errors.is_null() => Err(GatewayError::GraphQl(errors.to_string())),
            _ => Ok(body),
        }
    }

    pub async fn products(&self, shop: &str) -> Result<Vec<Value>, GatewayError> {
        let body = self
            .graphql(shop, PRODUCTS_QUERY, json!({ "first": PRODUCTS_PAGE_SIZE }))
            .await?;
        Ok(edge_nodes(&body["data"]["products"]))
    }

    pub async fn orders(&self, shop: &str, limit: u32) -> Result<Vec<Value>, GatewayError> {
        let body = self
            .graphql(shop, ORDERS_QUERY, json!({ "first": limit }))
            .await?;
        Ok(edge_nodes(&body["data"]["orders"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::shopify::session::MemorySessionStorage;

    fn gateway() -> ShopifyGateway {
        let config = ShopifyConfig {
            api_key: "key-1".to_string(),
            api_secret: "secret-1".to_string(),
            app_url: "https://dash.example.com/".to_string(),
            ..ShopifyConfig::default()
        };
        ShopifyGateway::new(config, Arc::new(MemorySessionStorage::new()))
    }

    #[test]
    fn shop_names_are_normalized() {
        assert_eq!(normalize_shop("demo").unwrap(), "demo.myshopify.com");
        assert_eq!(
            normalize_shop(" https://Demo.myshopify.com/ ").unwrap(),
            "demo.myshopify.com"
        );
        assert!(normalize_shop("").is_err());
        assert!(normalize_shop("evil.com/path?x=1").is_err());
    }

    #[test]
    fn foreign_hosts_are_rejected() {
        assert!(normalize_shop("attacker.example").is_err());
        assert!(normalize_shop("https://demo.myshopify.com.attacker.example").is_err());
        assert!(normalize_shop("a.b.myshopify.com").is_err());
        assert!(normalize_shop("-demo.myshopify.com").is_err());
        assert!(gateway().begin_auth("attacker.example").is_err());
    }

    #[test]
    fn edge_nodes_flattens_connections() {
        let connection = json!({ "edges": [ { "node": { "id": 1 } }, { "node": { "id": 2 } } ] });
        let nodes = edge_nodes(&connection);
        assert_eq!(nodes, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        assert!(edge_nodes(&Value::Null).is_empty());
    }

    #[test]
    fn authorize_url_carries_client_and_callback() {
        let url = gateway().begin_auth("demo").unwrap();
        assert_eq!(url.host_str(), Some("demo.myshopify.com"));
        assert_eq!(url.path(), "/admin/oauth/authorize");

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "key-1");
        assert_eq!(
            params["scope"],
            "read_products,read_orders,read_customers,read_inventory"
        );
        assert_eq!(
            params["redirect_uri"],
            "https://dash.example.com/api/auth/shopify/callback"
        );
        assert_eq!(params["state"].len(), 32);
    }

    #[tokio::test]
    async fn callback_with_unknown_state_is_rejected() {
        let gw = gateway();
        gw.begin_auth("demo").unwrap();
        let err = gw
            .complete_auth("demo", "code-1", Some("forged"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidState));
    }

    fn issued_state(gw: &ShopifyGateway, shop: &str) -> String {
        let url = gw.begin_auth(shop).unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        params["state"].clone()
    }

    #[test]
    fn forged_state_does_not_cancel_pending_install() {
        let gw = gateway();
        let state = issued_state(&gw, "demo");

        assert!(!gw.take_state("demo.myshopify.com", Some("forged")));
        assert!(!gw.take_state("demo.myshopify.com", None));
        assert!(gw.take_state("demo.myshopify.com", Some(&state)));
        assert!(!gw.take_state("demo.myshopify.com", Some(&state)));
    }

    #[test]
    fn expired_states_are_pruned() {
        let gw = gateway();
        issued_state(&gw, "old-shop");

        let mut pending = gw.pending_states.lock().unwrap();
        prune_pending(&mut pending, Instant::now() + STATE_TTL + Duration::from_secs(1));
        assert!(pending.is_empty());
    }

    #[test]
    fn pending_states_are_capped() {
        let gw = gateway();
        for n in 0..MAX_PENDING_STATES + 10 {
            gw.begin_auth(&format!("s{}", n)).unwrap();
        }

        assert!(gw.pending_states.lock().unwrap().len() <= MAX_PENDING_STATES);
        let newest = issued_state(&gw, "latest");
        assert!(gw.take_state("latest.myshopify.com", Some(&newest)));
    }

    #[tokio::test]
    async fn queries_without_session_fail_fast() {
        let err = gateway().products("demo").await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingSession(shop) if shop == "demo.myshopify.com"));
    }
}
