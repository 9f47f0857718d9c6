use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

use super::traits::{KeyValueStore, StorageEvent};

const STORAGE_FILE_NAME: &str = "storage.json";
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 本地键值存储
///
/// 一个 JSON 文件承载全部键值（`in_memory` 构造时不落盘，供测试使用）。
/// 写入为 write-through：每次 set/remove 立即重写文件。
/// 浏览器存储 API 在同源下天然串行，这里用读写锁模拟同样的串行语义。
pub struct LocalStorage {
    entries: RwLock<HashMap<String, String>>,
    path: Option<PathBuf>,
    events: broadcast::Sender<StorageEvent>,
}

impl LocalStorage {
    /// 打开目录下的持久化存储，文件不存在则从空状态开始
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("创建存储目录失败: {:?}", dir))?;
        let path = dir.join(STORAGE_FILE_NAME);

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    // 文件损坏按"无数据"处理，下次写入时覆盖
                    warn!("存储文件损坏，按空存储处理: {:?} - {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
            events,
        })
    }

    /// 纯内存存储，不落盘
    pub fn in_memory() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            path: None,
            events,
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string(entries)?;
            fs::write(path, raw)
                .with_context(|| format!("写入存储文件失败: {:?}", path))?;
        }
        Ok(())
    }

    fn notify(&self, key: &str, new_value: Option<String>, writer: u64) {
        // 没有订阅者时发送失败是正常情况
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            writer,
        });
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str, writer: u64) -> Result<()> {
        {
            let mut entries = self.entries.write();
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries)?;
        }
        self.notify(key, Some(value.to_string()), writer);
        Ok(())
    }

    fn remove(&self, key: &str, writer: u64) -> Result<()> {
        {
            let mut entries = self.entries.write();
            entries.remove(key);
            self.persist(&entries)?;
        }
        self.notify(key, None, writer);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
