// 通用工具
pub mod debounce;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
