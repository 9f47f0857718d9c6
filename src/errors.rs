use thiserror::Error;
use anyhow;

pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum EolError {
    #[error("参数无效: {0}")]
    InvalidParameter(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("目录获取失败: {0}")]
    CatalogFetchError(String),

    #[error("请求超时: {0}")]
    Timeout(String),

    #[error("缓存错误: {0}")]
    CacheError(String),

    #[error("存储错误: {0}")]
    StorageError(String),
}

impl EolError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EolError::InvalidParameter(_) => "INVALID_PARAMETER",
            EolError::NotFound(_) => "NOT_FOUND",
            EolError::CatalogFetchError(_) => "CATALOG_FETCH_ERROR",
            EolError::Timeout(_) => "TIMEOUT",
            EolError::CacheError(_) => "CACHE_ERROR",
            EolError::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// 检查错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        match self {
            EolError::CatalogFetchError(_)
            | EolError::Timeout(_)
            | EolError::CacheError(_)
            | EolError::StorageError(_) => true,
            EolError::InvalidParameter(_) | EolError::NotFound(_) => false,
        }
    }
}
