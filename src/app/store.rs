//! 条目列表存储
//!
//! 每种条目在内存中维护一个列表，任何修改后都把整个列表序列化写回
//! 本地存储的对应键。加载时读取并还原；内容损坏时记录错误并回退到
//! 内置的种子数据。

use std::sync::{Arc, PoisonError, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info, warn};

use crate::infrastructure::storage::{LocalStorage, StorageResult};

/// 可以放进 `ItemStore` 的条目
pub trait FundableItem: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 本地存储中的键
    const STORAGE_KEY: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// 本地存储为空或损坏时使用的初始列表
    fn seeds() -> Vec<Self>;

    /// 用同 id 的种子记录补全旧版本存储里缺失的字段
    fn merge_seed(&mut self, _seed: &Self) {}
}

pub struct ItemStore<T> {
    storage: Arc<dyn LocalStorage>,
    items: RwLock<Vec<T>>,
}

impl<T: FundableItem> ItemStore<T> {
    /// 从本地存储加载列表，不会失败
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let items = match storage.get_item(T::STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(mut items) => {
                    let seeds = T::seeds();
                    for item in items.iter_mut() {
                        if let Some(seed) = seeds.iter().find(|s| s.id() == item.id()) {
                            item.merge_seed(seed);
                        }
                    }
                    info!(key = T::STORAGE_KEY, count = items.len(), "已从本地存储加载");
                    items
                }
                Err(e) => {
                    error!(key = T::STORAGE_KEY, error = %e, "本地存储内容无法解析，使用默认数据");
                    T::seeds()
                }
            },
            Ok(None) => {
                let seeds = T::seeds();
                if let Err(e) = write_list(storage.as_ref(), &seeds) {
                    warn!(key = T::STORAGE_KEY, error = %e, "写入默认数据失败");
                }
                seeds
            }
            Err(e) => {
                error!(key = T::STORAGE_KEY, error = %e, "读取本地存储失败，使用默认数据");
                T::seeds()
            }
        };

        Self {
            storage,
            items: RwLock::new(items),
        }
    }

    pub fn list(&self) -> Vec<T> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// 分配 id 并插入到列表最前面
    ///
    /// id 取当前毫秒时间戳，与列表中已有 id 冲突时递增。
    pub fn create(&self, mut item: T) -> StorageResult<T> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);

        let mut id = chrono::Utc::now().timestamp_millis();
        while items.iter().any(|existing| existing.id() == id) {
            id += 1;
        }
        item.set_id(id);

        items.insert(0, item.clone());
        if let Err(e) = write_list(self.storage.as_ref(), &items) {
            items.remove(0);
            return Err(e);
        }
        Ok(item)
    }

    /// 原地修改一条记录，记录不存在时返回 `None`
    pub fn update<F>(&self, id: i64, edit: F) -> StorageResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = items.iter().position(|item| item.id() == id) else {
            return Ok(None);
        };

        let previous = items[pos].clone();
        edit(&mut items[pos]);
        items[pos].set_id(id);

        if let Err(e) = write_list(self.storage.as_ref(), &items) {
            items[pos] = previous;
            return Err(e);
        }
        Ok(Some(items[pos].clone()))
    }

    /// 删除一条记录，返回是否存在
    pub fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = items.iter().position(|item| item.id() == id) else {
            return Ok(false);
        };

        let removed = items.remove(pos);
        if let Err(e) = write_list(self.storage.as_ref(), &items) {
            items.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }
}

fn write_list<T: FundableItem>(storage: &dyn LocalStorage, items: &[T]) -> StorageResult<()> {
    let raw = serde_json::to_string(items)?;
    storage.set_item(T::STORAGE_KEY, &raw)
}
