use std::collections::HashMap;

/// 默认调色板（10 色循环使用）
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#FF6B6B", // Red
    "#4ECDC4", // Teal
    "#45B7D1", // Light Blue
    "#FFA07A", // Light Salmon
    "#98D8C8", // Mint Green
    "#F7DC6F", // Yellow
    "#BB8FCE", // Light Purple
    "#F0B27A", // Orange
    "#82E0AA", // Light Green
    "#D7BDE2", // Lavender
];

/// 产品颜色分配器
///
/// 首次见到的产品名按轮转顺序领取下一个调色板颜色，此后
/// 在分配器生命周期内保持不变。应用进程持有一个实例并传给
/// 任务推导，避免进程级隐藏状态在测试间泄漏。
pub struct ColorAssigner {
    palette: Vec<String>,
    assigned: HashMap<String, String>,
    next_index: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_palette(palette: Vec<String>) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
            next_index: 0,
        }
    }

    /// 产品对应的稳定颜色
    pub fn color_for(&mut self, product_name: &str) -> String {
        if let Some(color) = self.assigned.get(product_name) {
            return color.clone();
        }
        let color = self.palette[self.next_index % self.palette.len()].clone();
        self.next_index += 1;
        self.assigned
            .insert(product_name.to_string(), color.clone());
        color
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}
