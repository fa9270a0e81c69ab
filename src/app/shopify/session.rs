//! Shopify 会话存储
//!
//! 离线会话按 `offline_{shop}` 保存，只存在于进程内存中，重启后需要重新授权。

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSession {
    pub id: String,
    pub shop: String,
    pub access_token: String,
    pub scope: String,
}

impl ShopSession {
    pub fn offline_id(shop: &str) -> String {
        format!("offline_{}", shop)
    }
}

pub trait SessionStorage: Send + Sync {
    fn store_session(&self, session: ShopSession);
    fn load_session(&self, id: &str) -> Option<ShopSession>;
    fn delete_session(&self, id: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    sessions: RwLock<HashMap<String, ShopSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn store_session(&self, session: ShopSession) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id.clone(), session);
    }

    fn load_session(&self, id: &str) -> Option<ShopSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn delete_session(&self, id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }
}
