// 产品目录模块：数据模型、API 客户端、TTL 缓存与服务编排
pub mod cache;
pub mod client;
pub mod models;
pub mod service;

pub use cache::{
    CacheEntry, CatalogCache, CATALOG_LIST_CACHE_KEY, CATALOG_LIST_TTL_MS,
    PRODUCT_DETAILS_CACHE_KEY, PRODUCT_DETAILS_TTL_MS,
};
pub use client::{CatalogProvider, EolApiClient};
pub use models::{LifecycleField, ProductDetails, ProductVersionDetail};
pub use service::CatalogService;
