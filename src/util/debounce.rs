use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 默认防抖窗口（毫秒）
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// 尾沿防抖器
///
/// 窗口期内的连续输入只保留最后一个值，静默满一个窗口后
/// 回调恰好触发一次。对应搜索框输入：连续击键不触发过滤，
/// 停止输入 300ms 后用最终文本过滤一次。
pub struct Debouncer<T: Clone + Send + 'static> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Clone + Send + 'static> Debouncer<T> {
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let callback = Arc::new(callback);

        let worker = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    tokio::select! {
                        incoming = rx.recv() => match incoming {
                            // 新输入重置窗口
                            Some(value) => latest = value,
                            // 发送端已关闭：未到期的回调不再触发
                            None => return,
                        },
                        _ = tokio::time::sleep(window) => {
                            callback(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx, worker }
    }

    pub fn with_default_window<F>(callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS), callback)
    }

    /// 提交一个输入值，重置防抖窗口
    pub fn call(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

impl<T: Clone + Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
