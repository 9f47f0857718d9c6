use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::models::ProductVersionDetail;
use crate::errors::EolError;

/// 目录数据源接口
///
/// 生产实现为 [`EolApiClient`]，测试使用内存假实现。
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// 获取全部已知产品名
    async fn fetch_product_names(&self) -> Result<Vec<String>>;

    /// 获取单个产品的版本明细
    async fn fetch_product_details(
        &self,
        product_name: &str,
    ) -> Result<Vec<ProductVersionDetail>>;
}

/// endoflife.date API 客户端
pub struct EolApiClient {
    client: Client,
    base_url: String,
}

impl EolApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for EolApiClient {
    fn default() -> Self {
        Self::new("https://endoflife.date/api")
    }
}

#[async_trait]
impl CatalogProvider for EolApiClient {
    async fn fetch_product_names(&self) -> Result<Vec<String>> {
        let url = format!("{}/all.json", self.base_url);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => {
                Err(EolError::NotFound(format!("产品目录不存在: {}", url)).into())
            }
            status => Err(EolError::CatalogFetchError(format!(
                "获取产品目录失败: {} - HTTP {}",
                url, status
            ))
            .into()),
        }
    }

    async fn fetch_product_details(
        &self,
        product_name: &str,
    ) -> Result<Vec<ProductVersionDetail>> {
        let url = format!(
            "{}/{}.json",
            self.base_url,
            urlencoding::encode(product_name)
        );
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => {
                Err(EolError::NotFound(format!("产品不存在: {}", product_name)).into())
            }
            status => Err(EolError::CatalogFetchError(format!(
                "获取产品明细失败: {} - HTTP {}",
                product_name, status
            ))
            .into()),
        }
    }
}
