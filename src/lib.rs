//! # EOL Timeline Core
//!
//! EOL Timeline 应用的数据/状态核心：从 endoflife.date 公共 API
//! 抓取产品生命周期目录，维护用户选择状态，并推导出图表就绪的
//! 甘特任务。展示层（侧边栏、搜索框、图表组件）是外部协作方，
//! 只消费本 crate 暴露的数据。
//!
//! ## 特性
//!
//! - 📦 **目录抓取** - 产品列表与版本明细的 TTL 缓存，失败隔离与降级
//! - ✅ **选择状态** - 父子一致的勾选模型，持久化并跨实例同步
//! - 📊 **任务推导** - 结束日期优先级、生命周期状态与稳定配色
//! - ⏱️ **输入防抖** - 搜索输入的尾沿防抖（默认 300ms）
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use eol_timeline::catalog::{CatalogService, EolApiClient};
//! use eol_timeline::selection::SelectionStore;
//! use eol_timeline::storage::LocalStorage;
//! use eol_timeline::timeline::{derive_tasks, ColorAssigner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(LocalStorage::open(".eol_timeline")?);
//!     let service = CatalogService::new(Arc::new(EolApiClient::default()), store.clone());
//!
//!     let catalog = service.load_catalog().await?;
//!     let mut selection = SelectionStore::new(store, &catalog);
//!     selection.toggle("nodejs");
//!
//!     let mut colors = ColorAssigner::new();
//!     let tasks = derive_tasks(&catalog, selection.selected_set(), &mut colors);
//!     println!("{}", serde_json::to_string_pretty(&tasks)?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod selection;
pub mod storage;
pub mod timeline;
pub mod util;

pub use errors::{EolError, Result};

// Re-export commonly used types
pub use catalog::{ProductDetails, ProductVersionDetail};
pub use selection::SelectionStore;
pub use timeline::{EolStatus, GanttTask};
