// 任务推导模块：从目录 + 选择状态生成图表任务
pub mod derive;
pub mod models;
pub mod palette;

pub use derive::derive_tasks;
pub use models::{EolStatus, GanttTask};
pub use palette::{ColorAssigner, DEFAULT_PALETTE};
