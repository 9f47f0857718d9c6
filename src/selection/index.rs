use std::collections::HashMap;

use indexmap::IndexMap;

use crate::catalog::models::ProductDetails;

/// 组合键分隔符（产品名_版本线）
pub const KEY_SEPARATOR: char = '_';

/// 产品名 + 版本线 -> 组合键
pub fn composite_key(product_name: &str, cycle: &str) -> String {
    format!("{}{}{}", product_name, KEY_SEPARATOR, cycle)
}

/// 产品与版本键的双向索引
///
/// 从目录一次性构建，替代对选择键做字符串前缀匹配：
/// 产品名自身含分隔符时前缀解析会产生歧义，索引没有这个问题。
#[derive(Debug, Default)]
pub struct SelectionIndex {
    /// 产品 -> 组合键列表（目录顺序）
    versions_by_product: IndexMap<String, Vec<String>>,
    /// 组合键 -> 产品
    product_by_version: HashMap<String, String>,
}

impl SelectionIndex {
    pub fn build(catalog: &ProductDetails) -> Self {
        let mut versions_by_product = IndexMap::with_capacity(catalog.len());
        let mut product_by_version = HashMap::new();

        for (product_name, details) in catalog {
            let keys: Vec<String> = details
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|detail| composite_key(product_name, &detail.cycle))
                .collect();
            for key in &keys {
                product_by_version.insert(key.clone(), product_name.clone());
            }
            versions_by_product.insert(product_name.clone(), keys);
        }

        Self {
            versions_by_product,
            product_by_version,
        }
    }

    pub fn is_product(&self, id: &str) -> bool {
        self.versions_by_product.contains_key(id)
    }

    /// 组合键所属的产品名
    pub fn product_of(&self, version_key: &str) -> Option<&str> {
        self.product_by_version.get(version_key).map(String::as_str)
    }

    /// 产品的全部组合键（目录顺序）
    pub fn version_keys(&self, product_name: &str) -> &[String] {
        self.versions_by_product
            .get(product_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 目录顺序的产品名
    pub fn products(&self) -> impl Iterator<Item = &String> {
        self.versions_by_product.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.versions_by_product.is_empty()
    }
}
