//! 店铺连接服务
//!
//! 连接前先用商品查询验证会话可用，成功后把连接记录写入本地存储。

use std::sync::Arc;

use tracing::{error, info};

use super::gateway::{normalize_shop, ShopifyGateway};
use super::model::{StoreConnection, CONNECTION_STORAGE_KEY};
use crate::core::error::CoreError;
use crate::infrastructure::storage::LocalStorage;

#[derive(Clone)]
pub struct ConnectionService {
    storage: Arc<dyn LocalStorage>,
    gateway: Arc<ShopifyGateway>,
}

impl ConnectionService {
    pub fn new(storage: Arc<dyn LocalStorage>, gateway: Arc<ShopifyGateway>) -> Self {
        Self { storage, gateway }
    }

    /// 读取当前连接，内容损坏时视为未连接
    pub fn current(&self) -> Result<StoreConnection, CoreError> {
        let Some(raw) = self.storage.get_item(CONNECTION_STORAGE_KEY)? else {
            return Ok(StoreConnection::default());
        };

        match serde_json::from_str(&raw) {
            Ok(connection) => Ok(connection),
            Err(e) => {
                error!(error = %e, "店铺连接记录无法解析");
                Ok(StoreConnection::default())
            }
        }
    }

    pub async fn connect(&self, store_url: &str) -> Result<StoreConnection, CoreError> {
        let shop = normalize_shop(store_url)
            .map_err(|e| CoreError::from_gateway(e, "connect to Shopify store"))?;

        self.gateway
            .products(&shop)
            .await
            .map_err(|e| CoreError::from_gateway(e, "connect to Shopify store"))?;

        let connection = StoreConnection {
            connected: true,
            store_url: Some(shop),
        };
        let raw = serde_json::to_string(&connection)
            .map_err(|e| CoreError::InternalServerError(e.to_string()))?;
        self.storage.set_item(CONNECTION_STORAGE_KEY, &raw)?;

        info!(store_url = ?connection.store_url, "店铺已连接");
        Ok(connection)
    }

    pub fn disconnect(&self) -> Result<(), CoreError> {
        self.storage.remove_item(CONNECTION_STORAGE_KEY)?;
        info!("店铺连接已断开");
        Ok(())
    }
}
