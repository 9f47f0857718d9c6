use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use super::index::SelectionIndex;
use crate::catalog::models::ProductDetails;
use crate::storage::{allocate_writer_id, KeyValueStore, StorageEvent};

/// 选择状态的持久化键（跨版本兼容，不可更名）
pub const SELECTION_STORAGE_KEY: &str = "selectedProducts";

/// 用户选择状态
///
/// 维护"产品键被选中 ⟺ 其全部已知版本键被选中"的父子一致性，
/// 每次变更写入持久化存储，并通过存储事件与同一存储上的
/// 其他实例保持同步（对应浏览器多标签页场景）。
pub struct SelectionStore {
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Receiver<StorageEvent>,
    writer: u64,
    index: SelectionIndex,
    /// 展示顺序（插入序）的键列表；未变更的操作保持引用不变
    selected: Arc<Vec<String>>,
    selected_set: HashSet<String>,
}

impl SelectionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: &ProductDetails) -> Self {
        let events = store.subscribe();
        let selected = hydrate(store.as_ref());
        let selected_set = selected.iter().cloned().collect();

        Self {
            store,
            events,
            writer: allocate_writer_id(),
            index: SelectionIndex::build(catalog),
            selected: Arc::new(selected),
            selected_set,
        }
    }

    /// 当前选择（插入序）的共享快照
    pub fn selected(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.selected)
    }

    pub fn selected_set(&self) -> &HashSet<String> {
        &self.selected_set
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_set.contains(id)
    }

    /// 明细陆续到达后重建索引
    pub fn update_catalog(&mut self, catalog: &ProductDetails) {
        self.index = SelectionIndex::build(catalog);
    }

    /// 切换一个产品键或组合键，返回状态是否发生变化
    ///
    /// - 产品键：整组（产品 + 全部已知版本键）一次性加入/移除
    /// - 组合键：取消时连带取消父产品键；选中后若凑齐全部兄弟
    ///   版本则补选父产品键
    /// - 未知 id：无操作，快照引用保持不变
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.index.is_product(id) {
            let version_keys = self.index.version_keys(id).to_vec();
            if self.selected_set.contains(id) {
                let mut remove: HashSet<&str> = version_keys.iter().map(String::as_str).collect();
                remove.insert(id);
                let next: Vec<String> = self
                    .selected
                    .iter()
                    .filter(|k| !remove.contains(k.as_str()))
                    .cloned()
                    .collect();
                self.commit(next)
            } else {
                let mut next = (*self.selected).clone();
                push_missing(&mut next, &self.selected_set, id);
                for key in &version_keys {
                    push_missing(&mut next, &self.selected_set, key);
                }
                self.commit(next)
            }
        } else if let Some(product) = self.index.product_of(id).map(str::to_string) {
            if self.selected_set.contains(id) {
                let next: Vec<String> = self
                    .selected
                    .iter()
                    .filter(|k| k.as_str() != id && **k != product)
                    .cloned()
                    .collect();
                self.commit(next)
            } else {
                let mut next = (*self.selected).clone();
                push_missing(&mut next, &self.selected_set, id);

                let siblings = self.index.version_keys(&product);
                let all_selected = siblings
                    .iter()
                    .all(|key| key == id || self.selected_set.contains(key));
                if all_selected {
                    push_missing(&mut next, &self.selected_set, &product);
                }
                self.commit(next)
            }
        } else {
            // 未知 id：既不是产品也不是可推导的版本键
            false
        }
    }

    /// 选中目录里所有可推导的键
    pub fn select_all(&mut self) -> bool {
        let mut next = (*self.selected).clone();
        let products: Vec<String> = self.index.products().cloned().collect();
        for product in &products {
            push_missing(&mut next, &self.selected_set, product);
            for key in self.index.version_keys(product) {
                push_missing(&mut next, &self.selected_set, key);
            }
        }
        self.commit(next)
    }

    pub fn clear_all(&mut self) -> bool {
        self.commit(Vec::new())
    }

    /// 处理积压的存储事件，使本实例与其他实例保持一致
    ///
    /// 只响应其他写入者对选择槽位的变更，自身写入的回声被跳过。
    pub fn sync(&mut self) {
        let mut latest: Option<Option<String>> = None;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if event.writer != self.writer && event.key == SELECTION_STORAGE_KEY {
                        latest = Some(event.new_value);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("存储事件积压丢失 {} 条，改为直接重读存储", skipped);
                    latest = Some(match self.store.get(SELECTION_STORAGE_KEY) {
                        Ok(value) => value,
                        Err(e) => {
                            warn!("重读选择状态失败: {}", e);
                            None
                        }
                    });
                }
                Err(_) => break,
            }
        }

        if let Some(new_value) = latest {
            let selected = parse_selection(new_value);
            // 镜像外部变更，不再写回存储（避免回声循环）
            self.selected_set = selected.iter().cloned().collect();
            self.selected = Arc::new(selected);
        }
    }

    fn commit(&mut self, next: Vec<String>) -> bool {
        if *self.selected == next {
            return false;
        }
        self.selected_set = next.iter().cloned().collect();
        self.selected = Arc::new(next);
        self.persist();
        true
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&*self.selected) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("序列化选择状态失败: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(SELECTION_STORAGE_KEY, &raw, self.writer) {
            warn!("写入选择状态失败: {}", e);
        }
    }
}

fn push_missing(next: &mut Vec<String>, current: &HashSet<String>, key: &str) {
    if !current.contains(key) && !next.iter().any(|k| k == key) {
        next.push(key.to_string());
    }
}

fn hydrate(store: &dyn KeyValueStore) -> Vec<String> {
    match store.get(SELECTION_STORAGE_KEY) {
        Ok(value) => parse_selection(value),
        Err(e) => {
            warn!("读取选择状态失败: {}", e);
            Vec::new()
        }
    }
}

fn parse_selection(raw: Option<String>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(selected) => selected,
        Err(e) => {
            // 持久化内容损坏按"无选择"处理，错误只进日志
            warn!("选择状态内容损坏，重置为空: {}", e);
            Vec::new()
        }
    }
}
