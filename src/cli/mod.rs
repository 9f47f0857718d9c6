use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::catalog::{CatalogService, EolApiClient, ProductDetails};
use crate::config::AppConfig;
use crate::selection::{SelectionStore, KEY_SEPARATOR};
use crate::storage::LocalStorage;
use crate::timeline::{derive_tasks, ColorAssigner};

#[derive(Parser)]
#[command(
    name = "eol-timeline",
    version,
    about = "浏览软件产品的生命周期终点日期，推导甘特图任务"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// 列出目录中的全部产品
    List,
    /// 切换产品键或组合键（如 react、react_18）的选中状态
    Toggle {
        /// 一个或多个选择键
        ids: Vec<String>,
    },
    /// 选中目录里所有可推导的键
    SelectAll,
    /// 清空选择
    Clear,
    /// 输出当前选择推导出的甘特任务（JSON）
    Tasks,
    /// 刷新已选中且缓存过期的产品明细
    Refresh,
}

pub async fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let store: Arc<LocalStorage> = Arc::new(LocalStorage::open(&config.data_dir)?);
    let provider = Arc::new(EolApiClient::new(config.api_base_url.clone()));
    let service = CatalogService::new(provider, store.clone());

    match cli.command {
        Command::List => {
            let catalog = service.load_catalog().await?;
            for (name, details) in &catalog {
                match details {
                    Some(versions) => println!("{} ({} 个版本)", name, versions.len()),
                    None => println!("{}", name),
                }
            }
            info!("目录共 {} 个产品", catalog.len());
        }
        Command::Toggle { ids } => {
            let mut catalog = service.load_catalog().await?;

            // 先补齐目标产品的明细，保证父子级联完整
            for id in &ids {
                if let Some(product) = resolve_product(&catalog, id) {
                    let details = service.load_product_details(&product).await?;
                    catalog.insert(product, Some(details));
                }
            }

            let mut selection = SelectionStore::new(store, &catalog);
            for id in &ids {
                if selection.toggle(id) {
                    let state = if selection.is_selected(id) {
                        "已选中"
                    } else {
                        "已取消"
                    };
                    println!("{}: {}", state, id);
                } else {
                    warn!("未知的选择键，忽略: {}", id);
                }
            }
        }
        Command::SelectAll => {
            let catalog = service.load_catalog().await?;
            let mut selection = SelectionStore::new(store, &catalog);
            selection.select_all();
            println!("已选中 {} 个键", selection.selected().len());
        }
        Command::Clear => {
            let catalog = service.load_catalog().await?;
            let mut selection = SelectionStore::new(store, &catalog);
            selection.clear_all();
            println!("选择已清空");
        }
        Command::Tasks => {
            let mut catalog = service.load_catalog().await?;
            let selected_keys = {
                let selection = SelectionStore::new(store.clone(), &catalog);
                selection.selected()
            };

            // 推导需要被选中产品的明细，缺失的按需抓取
            for key in selected_keys.iter() {
                if let Some(product) = resolve_product(&catalog, key) {
                    if matches!(catalog.get(product.as_str()), Some(None)) {
                        let details = service.load_product_details(&product).await?;
                        catalog.insert(product, Some(details));
                    }
                }
            }

            let selection = SelectionStore::new(store, &catalog);
            let mut colors = ColorAssigner::new();
            let tasks = derive_tasks(&catalog, selection.selected_set(), &mut colors);
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Command::Refresh => {
            let mut catalog = service.load_catalog().await?;
            let mut selection = SelectionStore::new(store, &catalog);
            service
                .refresh_selected_details(&mut selection, &mut catalog)
                .await?;
            println!("刷新完成，当前选择 {} 个键", selection.selected().len());
        }
    }

    Ok(())
}

/// 把用户输入的选择键解析为目录里的产品名
///
/// 精确命中产品名，或者取能作为 `{产品}_` 前缀的最长产品名
/// （仅用于解析命令行输入；选择状态内部走索引，不做前缀匹配）。
fn resolve_product(catalog: &ProductDetails, id: &str) -> Option<String> {
    if catalog.contains_key(id) {
        return Some(id.to_string());
    }
    catalog
        .keys()
        .filter(|name| {
            id.len() > name.len()
                && id.starts_with(name.as_str())
                && id[name.len()..].starts_with(KEY_SEPARATOR)
        })
        .max_by_key(|name| name.len())
        .cloned()
}
