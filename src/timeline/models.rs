use serde::{Deserialize, Serialize};

/// 任务的生命周期状态（序列化为数字，图表侧据此着色）
///
/// - 0：有明确的结束日期（support 或 eol 为具体日期）
/// - 1：仍在支持窗口内，结束日期未知
/// - 2：已过生命周期终点，日期未知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EolStatus {
    Active,
    SupportOnly,
    PastEol,
}

impl From<EolStatus> for u8 {
    fn from(status: EolStatus) -> Self {
        match status {
            EolStatus::Active => 0,
            EolStatus::SupportOnly => 1,
            EolStatus::PastEol => 2,
        }
    }
}

impl TryFrom<u8> for EolStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EolStatus::Active),
            1 => Ok(EolStatus::SupportOnly),
            2 => Ok(EolStatus::PastEol),
            other => Err(format!("无效的 eol_status 值: {}", other)),
        }
    }
}

impl EolStatus {
    /// 展示名称里追加的状态后缀
    pub fn name_suffix(&self) -> &'static str {
        match self {
            EolStatus::Active => "",
            EolStatus::SupportOnly => " |----------> Support",
            EolStatus::PastEol => " | EOL",
        }
    }
}

/// 图表就绪的任务记录
///
/// 每次推导全量重建，从不原地修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    /// 版本线标识
    pub id: String,
    /// 展示名称（含状态后缀）
    pub name: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    /// 开始日期（ISO 日期字符串）
    pub start: String,
    /// 结束日期（ISO 日期字符串）
    pub end: String,
    /// 目前恒为 0
    pub progress: u8,
    /// 同一产品的所有任务共享的颜色
    pub color: String,
    pub eol_status: EolStatus,
}
