//! 端到端流程测试：目录服务 -> 选择状态 -> 任务推导
//!
//! 使用内存假数据源，不访问真实网络。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use eol_timeline::catalog::{CatalogProvider, CatalogService, ProductVersionDetail};
use eol_timeline::selection::SelectionStore;
use eol_timeline::storage::LocalStorage;
use eol_timeline::timeline::{derive_tasks, ColorAssigner, EolStatus};

struct FakeProvider {
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeProvider {
    fn new() -> Self {
        Self {
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogProvider for FakeProvider {
    async fn fetch_product_names(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["nodejs".to_string(), "react".to_string()])
    }

    async fn fetch_product_details(
        &self,
        product_name: &str,
    ) -> Result<Vec<ProductVersionDetail>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let raw = match product_name {
            "nodejs" => serde_json::json!([
                {"cycle": "20", "releaseDate": "2023-04-18", "support": "2024-10-22", "eol": "2026-04-30"},
                {"cycle": "18", "releaseDate": "2022-04-19", "support": true, "eol": false},
                {"cycle": "14", "releaseDate": "2020-04-21", "eol": true}
            ]),
            "react" => serde_json::json!([
                {"cycle": "18", "releaseDate": "2022-03-29"}
            ]),
            other => anyhow::bail!("产品不存在: {}", other),
        };
        Ok(serde_json::from_value(raw)?)
    }
}

#[tokio::test]
async fn test_full_flow_from_catalog_to_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::new());

    let store = Arc::new(LocalStorage::open(dir.path()).unwrap());
    let service = CatalogService::new(provider.clone(), store.clone());

    // 目录加载：所有产品明细延迟
    let mut catalog = service.load_catalog().await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.values().all(Option::is_none));

    // 按需抓取 nodejs 明细
    let details = service.load_product_details("nodejs").await.unwrap();
    assert_eq!(details.len(), 3);
    catalog.insert("nodejs".to_string(), Some(details));

    // 选中整个产品，父子级联
    let mut selection = SelectionStore::new(store.clone(), &catalog);
    selection.toggle("nodejs");
    assert!(selection.is_selected("nodejs_20"));
    assert!(selection.is_selected("nodejs_18"));
    assert!(selection.is_selected("nodejs_14"));

    // 推导任务
    let mut colors = ColorAssigner::new();
    let tasks = derive_tasks(&catalog, selection.selected_set(), &mut colors);
    assert_eq!(tasks.len(), 3);

    // support 日期优先于 eol 日期
    assert_eq!(tasks[0].id, "20");
    assert_eq!(tasks[0].end, "2024-10-22");
    assert_eq!(tasks[0].eol_status, EolStatus::Active);
    assert_eq!(tasks[0].name, "nodejs 20");

    // support:true / eol:false -> 支持窗口
    assert_eq!(tasks[1].end, "2022-04-19");
    assert_eq!(tasks[1].eol_status, EolStatus::SupportOnly);
    assert_eq!(tasks[1].name, "nodejs 18 |----------> Support");

    // eol:true -> 已过生命周期
    assert_eq!(tasks[2].eol_status, EolStatus::PastEol);
    assert_eq!(tasks[2].name, "nodejs 14 | EOL");

    // 同一产品共享颜色
    assert_eq!(tasks[0].color, tasks[1].color);
    assert_eq!(tasks[0].color, tasks[2].color);
}

#[tokio::test]
async fn test_second_session_runs_from_cache_and_persisted_selection() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(FakeProvider::new());

    // 第一个会话：抓取并选择
    {
        let store = Arc::new(LocalStorage::open(dir.path()).unwrap());
        let service = CatalogService::new(provider.clone(), store.clone());
        let mut catalog = service.load_catalog().await.unwrap();
        let details = service.load_product_details("react").await.unwrap();
        catalog.insert("react".to_string(), Some(details));

        let mut selection = SelectionStore::new(store, &catalog);
        selection.toggle("react_18");
    }
    assert_eq!(provider.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 1);

    // 第二个会话：列表与明细都命中缓存，选择自动恢复
    let store = Arc::new(LocalStorage::open(dir.path()).unwrap());
    let service = CatalogService::new(provider.clone(), store.clone());
    let catalog = service.load_catalog().await.unwrap();
    assert!(catalog["react"].is_some());
    assert_eq!(provider.list_calls.load(Ordering::SeqCst), 1);

    let details = service.load_product_details("react").await.unwrap();
    assert_eq!(details[0].cycle, "18");
    assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 1);

    let selection = SelectionStore::new(store, &catalog);
    assert!(selection.is_selected("react_18"));
    // react 只有一个版本，父键在上个会话已被补选
    assert!(selection.is_selected("react"));

    let mut colors = ColorAssigner::new();
    let tasks = derive_tasks(&catalog, selection.selected_set(), &mut colors);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].product_name, "react");
}
