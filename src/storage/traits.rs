use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use tokio::sync::broadcast;

/// 存储变更事件
///
/// 对应浏览器 `storage` 事件：同一份持久化存储上的其他实例
/// 通过该事件感知变更。`writer` 用于过滤自身写入产生的回声。
#[derive(Debug, Clone)]
pub struct StorageEvent {
    pub key: String,
    pub new_value: Option<String>,
    pub writer: u64,
}

static NEXT_WRITER_ID: AtomicU64 = AtomicU64::new(1);

/// 分配写入者标识，每个会写存储的组件持有一个
pub fn allocate_writer_id() -> u64 {
    NEXT_WRITER_ID.fetch_add(1, Ordering::Relaxed)
}

/// 键值存储接口（浏览器 localStorage 的抽象）
///
/// 读写都是同步的；变更通知通过广播通道分发。
pub trait KeyValueStore: Send + Sync {
    /// 读取指定键的原始字符串值
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入键值，并向订阅者广播变更
    fn set(&self, key: &str, value: &str, writer: u64) -> Result<()>;

    /// 删除键，并向订阅者广播变更
    fn remove(&self, key: &str, writer: u64) -> Result<()>;

    /// 订阅存储变更事件
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
