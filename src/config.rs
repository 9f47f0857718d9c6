use std::path::PathBuf;

/// 应用配置
///
/// 全部来自环境变量（`.env` 由 main 负责加载），未设置时使用默认值。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// endoflife.date API 的基础地址
    pub api_base_url: String,
    /// 持久化存储目录（选择状态与缓存落盘位置）
    pub data_dir: PathBuf,
    /// 搜索输入防抖窗口（毫秒）
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://endoflife.date/api".to_string(),
            data_dir: PathBuf::from(".eol_timeline"),
            debounce_ms: 300,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = std::env::var("EOL_API_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let data_dir = std::env::var("EOL_TIMELINE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let debounce_ms = std::env::var("EOL_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.debounce_ms);

        Self {
            api_base_url,
            data_dir,
            debounce_ms,
        }
    }
}
