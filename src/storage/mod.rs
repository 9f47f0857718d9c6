// 持久化存储模块
pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{allocate_writer_id, KeyValueStore, StorageEvent};
