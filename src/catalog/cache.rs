use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use super::models::ProductVersionDetail;
use crate::storage::{allocate_writer_id, KeyValueStore};

/// 产品目录（名称列表）的缓存键
pub const CATALOG_LIST_CACHE_KEY: &str = "eol_products_list_cache";
/// 各产品版本明细的缓存键（单键承载整个映射）
pub const PRODUCT_DETAILS_CACHE_KEY: &str = "eol_products_details_cache";

/// 目录列表缓存有效期：1 天
pub const CATALOG_LIST_TTL_MS: i64 = 24 * 60 * 60 * 1000;
/// 产品明细缓存有效期：1 周
pub const PRODUCT_DETAILS_TTL_MS: i64 = 7 * CATALOG_LIST_TTL_MS;

/// 缓存信封：数据 + 写入时刻（epoch 毫秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// 指定时刻构造，测试和缓存迁移用
    pub fn with_timestamp(data: T, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    /// 在 `now_ms` 时刻该条目是否仍然有效
    pub fn is_fresh_at(&self, ttl_ms: i64, now_ms: i64) -> bool {
        now_ms - self.timestamp < ttl_ms
    }

    pub fn is_fresh(&self, ttl_ms: i64) -> bool {
        self.is_fresh_at(ttl_ms, Utc::now().timestamp_millis())
    }
}

pub type DetailsCacheMap = HashMap<String, CacheEntry<Vec<ProductVersionDetail>>>;

/// 目录 TTL 缓存，落在持久化键值存储上
pub struct CatalogCache {
    store: Arc<dyn KeyValueStore>,
    writer: u64,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            writer: allocate_writer_id(),
        }
    }

    /// 读取目录列表缓存条目（损坏或缺失返回 None）
    pub fn load_list(&self) -> Option<CacheEntry<Vec<String>>> {
        self.load_slot(CATALOG_LIST_CACHE_KEY)
    }

    pub fn store_list(&self, names: &[String]) -> Result<()> {
        let entry = CacheEntry::new(names.to_vec());
        self.store_slot(CATALOG_LIST_CACHE_KEY, &entry)
    }

    /// 读取整张明细缓存映射（损坏或缺失返回空映射）
    pub fn load_details_map(&self) -> DetailsCacheMap {
        self.load_slot(PRODUCT_DETAILS_CACHE_KEY).unwrap_or_default()
    }

    /// 仍在有效期内的版本明细
    pub fn fresh_details(&self, product_name: &str) -> Option<Vec<ProductVersionDetail>> {
        let map = self.load_details_map();
        let entry = map.get(product_name)?;
        if entry.is_fresh(PRODUCT_DETAILS_TTL_MS) {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// 不论新旧的版本明细（失败降级时兜底用）
    pub fn any_details(&self, product_name: &str) -> Option<Vec<ProductVersionDetail>> {
        self.load_details_map()
            .remove(product_name)
            .map(|entry| entry.data)
    }

    /// 指定产品的明细缓存是否已过期（无缓存视为过期）
    pub fn details_obsolete(&self, product_name: &str) -> bool {
        match self.load_details_map().get(product_name) {
            Some(entry) => !entry.is_fresh(PRODUCT_DETAILS_TTL_MS),
            None => true,
        }
    }

    /// 写入单个产品的明细（读改写整张映射）
    pub fn store_details(
        &self,
        product_name: &str,
        details: &[ProductVersionDetail],
    ) -> Result<()> {
        let mut map = self.load_details_map();
        map.insert(product_name.to_string(), CacheEntry::new(details.to_vec()));
        self.store_slot(PRODUCT_DETAILS_CACHE_KEY, &map)
    }

    fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("读取缓存失败: {} - {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // 缓存损坏视同不存在，下次写入时覆盖
                warn!("缓存内容损坏，忽略: {} - {}", key, e);
                None
            }
        }
    }

    fn store_slot<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    fn detail(cycle: &str) -> ProductVersionDetail {
        serde_json::from_value(serde_json::json!({
            "cycle": cycle,
            "releaseDate": "2020-09-18"
        }))
        .unwrap()
    }

    #[test]
    fn test_list_roundtrip() {
        let cache = CatalogCache::new(Arc::new(LocalStorage::in_memory()));
        assert!(cache.load_list().is_none());

        cache
            .store_list(&["nodejs".to_string(), "react".to_string()])
            .unwrap();
        let entry = cache.load_list().unwrap();
        assert_eq!(entry.data, vec!["nodejs", "react"]);
        assert!(entry.is_fresh(CATALOG_LIST_TTL_MS));
    }

    #[test]
    fn test_freshness_boundary() {
        let now = Utc::now().timestamp_millis();
        let just_fresh =
            CacheEntry::with_timestamp(vec!["x".to_string()], now - (CATALOG_LIST_TTL_MS - 1));
        let just_stale =
            CacheEntry::with_timestamp(vec!["x".to_string()], now - (CATALOG_LIST_TTL_MS + 1));

        assert!(just_fresh.is_fresh_at(CATALOG_LIST_TTL_MS, now));
        assert!(!just_stale.is_fresh_at(CATALOG_LIST_TTL_MS, now));
    }

    #[test]
    fn test_stale_details_not_returned_as_fresh() {
        let store = Arc::new(LocalStorage::in_memory());
        let cache = CatalogCache::new(store.clone());

        // 人为写入一个过期条目
        let mut map = DetailsCacheMap::new();
        map.insert(
            "nodejs".to_string(),
            CacheEntry::with_timestamp(
                vec![detail("18")],
                Utc::now().timestamp_millis() - PRODUCT_DETAILS_TTL_MS - 1,
            ),
        );
        store
            .set(
                PRODUCT_DETAILS_CACHE_KEY,
                &serde_json::to_string(&map).unwrap(),
                0,
            )
            .unwrap();

        assert!(cache.fresh_details("nodejs").is_none());
        assert!(cache.details_obsolete("nodejs"));
        // 过期数据仍可作为降级兜底读取
        assert_eq!(cache.any_details("nodejs").unwrap()[0].cycle, "18");
    }

    #[test]
    fn test_corrupt_cache_treated_as_absent() {
        let store = Arc::new(LocalStorage::in_memory());
        store.set(CATALOG_LIST_CACHE_KEY, "{broken", 0).unwrap();

        let cache = CatalogCache::new(store);
        assert!(cache.load_list().is_none());
        assert!(cache.load_details_map().is_empty());
    }

    #[test]
    fn test_store_details_merges_into_map() {
        let cache = CatalogCache::new(Arc::new(LocalStorage::in_memory()));
        cache.store_details("nodejs", &[detail("18")]).unwrap();
        cache.store_details("react", &[detail("17")]).unwrap();

        let map = cache.load_details_map();
        assert_eq!(map.len(), 2);
        assert_eq!(cache.fresh_details("nodejs").unwrap()[0].cycle, "18");
        assert!(!cache.details_obsolete("react"));
    }
}
