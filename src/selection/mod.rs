// 选择状态模块
pub mod index;
pub mod store;

pub use index::{composite_key, SelectionIndex, KEY_SEPARATOR};
pub use store::{SelectionStore, SELECTION_STORAGE_KEY};
