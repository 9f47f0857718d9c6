use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// `eol` / `support` 等生命周期字段的三态值
///
/// API 中这些字段要么是具体日期字符串，要么是布尔值，要么整体缺省
/// （缺省由外层 `Option` 表达）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LifecycleField {
    Date(String),
    Flag(bool),
}

impl LifecycleField {
    pub fn as_date(&self) -> Option<&str> {
        match self {
            LifecycleField::Date(d) => Some(d),
            LifecycleField::Flag(_) => None,
        }
    }
}

/// 产品的一个发布周期（版本线）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersionDetail {
    /// 版本线标识，如 "18"、"3.1"（API 偶尔返回数字，统一转为字符串）
    #[serde(deserialize_with = "deserialize_cycle")]
    pub cycle: String,
    /// 发布日期（ISO 日期字符串）
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol: Option<LifecycleField>,
    /// 存在时优先于 `eol` 参与结束日期推导
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<LifecycleField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(
        rename = "latestReleaseDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lts: Option<LifecycleField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<LifecycleField>,
}

/// 产品目录：产品名 -> 版本明细
///
/// - `None`：尚未抓取（界面显示骨架屏）
/// - `Some(vec![])`：本会话抓取过且失败（哨兵值，抑制重试）
/// - `Some(details)`：按 API 返回顺序保存的版本明细
///
/// 使用 IndexMap 保证目录迭代顺序与插入顺序一致。
pub type ProductDetails = IndexMap<String, Option<Vec<ProductVersionDetail>>>;

fn deserialize_cycle<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "cycle 字段类型无效: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_detail_with_date_fields() {
        let raw = r#"{
            "cycle": "18",
            "releaseDate": "2022-04-19",
            "eol": "2025-04-30",
            "support": "2023-10-18",
            "latest": "18.20.4",
            "lts": true
        }"#;
        let detail: ProductVersionDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.cycle, "18");
        assert_eq!(detail.release_date, "2022-04-19");
        assert_eq!(
            detail.eol,
            Some(LifecycleField::Date("2025-04-30".to_string()))
        );
        assert_eq!(
            detail.support,
            Some(LifecycleField::Date("2023-10-18".to_string()))
        );
        assert_eq!(detail.lts, Some(LifecycleField::Flag(true)));
    }

    #[test]
    fn test_deserialize_detail_with_boolean_and_absent_fields() {
        let raw = r#"{"cycle": "1", "releaseDate": "2020-09-18", "eol": false}"#;
        let detail: ProductVersionDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.eol, Some(LifecycleField::Flag(false)));
        assert_eq!(detail.support, None);
    }

    #[test]
    fn test_numeric_cycle_is_normalized_to_string() {
        let raw = r#"{"cycle": 8, "releaseDate": "2017-09-21"}"#;
        let detail: ProductVersionDetail = serde_json::from_str(raw).unwrap();
        assert_eq!(detail.cycle, "8");
    }
}
