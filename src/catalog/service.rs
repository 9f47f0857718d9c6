use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::cache::{CatalogCache, PRODUCT_DETAILS_TTL_MS};
use super::client::CatalogProvider;
use super::models::{ProductDetails, ProductVersionDetail};
use crate::selection::{composite_key, SelectionStore};
use crate::storage::KeyValueStore;

/// 目录服务：TTL 缓存 + 远端抓取的组合
///
/// 单个产品的抓取失败彼此隔离，不会中断其他产品；
/// 目录列表抓取失败是致命错误，向调用方传播。
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    cache: CatalogCache,
    /// 本会话内抓取失败过的产品，抑制重复重试
    failed_this_session: Mutex<HashSet<String>>,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn CatalogProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            cache: CatalogCache::new(store),
            failed_this_session: Mutex::new(HashSet::new()),
        }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// 加载产品目录
    ///
    /// 列表缓存仍然有效时不发起网络请求；否则抓取 `all.json`
    /// 并刷新缓存时间戳。返回的映射中，明细缓存仍然有效的产品
    /// 直接携带数据，其余为 `None`（延迟抓取）。
    pub async fn load_catalog(&self) -> Result<ProductDetails> {
        let names = match self.cache.load_list() {
            Some(entry) if entry.is_fresh(super::cache::CATALOG_LIST_TTL_MS) => {
                debug!("目录列表命中缓存，共 {} 个产品", entry.data.len());
                entry.data
            }
            _ => {
                info!("目录列表缓存缺失或过期，从 API 抓取");
                let names = self.provider.fetch_product_names().await?;
                if let Err(e) = self.cache.store_list(&names) {
                    warn!("写入目录列表缓存失败: {}", e);
                }
                names
            }
        };

        let mut catalog = ProductDetails::with_capacity(names.len());
        for name in names {
            let details = self.cache.fresh_details(&name);
            catalog.insert(name, details);
        }
        Ok(catalog)
    }

    /// 加载单个产品的版本明细
    ///
    /// 缓存新鲜则直接返回；本会话已失败且无历史数据的产品
    /// 直接返回空哨兵，不再重试。抓取失败不写缓存：有旧数据
    /// 时降级返回旧数据，否则记录失败并返回空数组。
    pub async fn load_product_details(
        &self,
        product_name: &str,
    ) -> Result<Vec<ProductVersionDetail>> {
        if let Some(details) = self.cache.fresh_details(product_name) {
            return Ok(details);
        }

        if self.failed_this_session.lock().contains(product_name)
            && self.cache.any_details(product_name).is_none()
        {
            debug!("产品 {} 本会话已抓取失败，跳过重试", product_name);
            return Ok(Vec::new());
        }

        match self.provider.fetch_product_details(product_name).await {
            Ok(details) => {
                if let Err(e) = self.cache.store_details(product_name, &details) {
                    warn!("写入产品明细缓存失败: {} - {}", product_name, e);
                }
                self.failed_this_session.lock().remove(product_name);
                Ok(details)
            }
            Err(e) => {
                warn!("获取产品明细失败: {} - {}", product_name, e);
                match self.cache.any_details(product_name) {
                    // 有旧数据就继续用旧数据，缓存保持原样
                    Some(stale) => Ok(stale),
                    None => {
                        self.failed_this_session
                            .lock()
                            .insert(product_name.to_string());
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    /// 刷新已选中且缓存过期的产品明细
    ///
    /// 刷新前先把旧明细灌入目录并重建选择索引，保证随后对
    /// 消失版本的 `toggle` 能被识别。各产品并发抓取、独立容错，
    /// 成功后把新响应里已不存在、却仍被选中的组合键逐个取消
    /// （每个键恰好一次）。
    pub async fn refresh_selected_details(
        &self,
        selection: &mut SelectionStore,
        catalog: &mut ProductDetails,
    ) -> Result<()> {
        let details_map = self.cache.load_details_map();

        let mut targets: Vec<String> = Vec::new();
        for (product, entry) in &details_map {
            if !catalog.contains_key(product) {
                continue;
            }
            let is_selected = selection.is_selected(product)
                || entry
                    .data
                    .iter()
                    .any(|d| selection.is_selected(&composite_key(product, &d.cycle)));
            let is_obsolete = !entry.is_fresh(PRODUCT_DETAILS_TTL_MS);
            if is_selected && is_obsolete {
                targets.push(product.clone());
            }
        }

        if targets.is_empty() {
            return Ok(());
        }
        info!("刷新 {} 个过期产品的明细", targets.len());

        // 旧数据先上屏，同时让索引认识旧版本键
        for product in &targets {
            if let Some(entry) = details_map.get(product) {
                catalog.insert(product.clone(), Some(entry.data.clone()));
            }
        }
        selection.update_catalog(catalog);

        let fetches = targets.iter().map(|product| {
            let provider = Arc::clone(&self.provider);
            let product = product.clone();
            async move {
                let result = provider.fetch_product_details(&product).await;
                (product, result)
            }
        });
        let results = futures::future::join_all(fetches).await;

        for (product, result) in results {
            match result {
                Ok(details) => {
                    let new_cycles: HashSet<&str> =
                        details.iter().map(|d| d.cycle.as_str()).collect();
                    let old_details = details_map
                        .get(&product)
                        .map(|entry| entry.data.as_slice())
                        .unwrap_or_default();

                    for old in old_details {
                        if new_cycles.contains(old.cycle.as_str()) {
                            continue;
                        }
                        let stale_key = composite_key(&product, &old.cycle);
                        if selection.is_selected(&stale_key) {
                            info!("版本已从 API 消失，取消选择: {}", stale_key);
                            selection.toggle(&stale_key);
                        }
                    }

                    if let Err(e) = self.cache.store_details(&product, &details) {
                        warn!("写入产品明细缓存失败: {} - {}", product, e);
                    }
                    catalog.insert(product, Some(details));
                }
                Err(e) => {
                    // 单个产品失败不影响其余产品的刷新
                    warn!("刷新产品明细失败: {} - {}", product, e);
                }
            }
        }

        selection.update_catalog(catalog);
        Ok(())
    }
}
