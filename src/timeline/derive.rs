use std::collections::HashSet;

use super::models::{EolStatus, GanttTask};
use super::palette::ColorAssigner;
use crate::catalog::models::{LifecycleField, ProductDetails, ProductVersionDetail};
use crate::selection::composite_key;

/// 把选中的产品/版本推导为图表任务
///
/// 纯转换：目录迭代顺序输出，版本保持产品内原始顺序，
/// 排序交给展示层。产品键被选中时输出其全部版本，否则只输出
/// 被单独选中的版本。
pub fn derive_tasks(
    catalog: &ProductDetails,
    selected: &HashSet<String>,
    colors: &mut ColorAssigner,
) -> Vec<GanttTask> {
    let mut tasks = Vec::new();

    for (product_name, details) in catalog {
        let Some(details) = details else { continue };
        let product_selected = selected.contains(product_name);

        for detail in details {
            if !product_selected
                && !selected.contains(&composite_key(product_name, &detail.cycle))
            {
                continue;
            }
            let color = colors.color_for(product_name);
            tasks.push(build_task(product_name, detail, color));
        }
    }

    tasks
}

fn build_task(product_name: &str, detail: &ProductVersionDetail, color: String) -> GanttTask {
    let (end, status) = resolve_end_and_status(detail);
    GanttTask {
        id: detail.cycle.clone(),
        name: format!("{} {}{}", product_name, detail.cycle, status.name_suffix()),
        product_name: product_name.to_string(),
        start: detail.release_date.clone(),
        end,
        progress: 0,
        color,
        eol_status: status,
    }
}

/// 结束日期与状态推导
///
/// 日期优先级：support 的具体日期 > eol 的具体日期 > 发布日期
/// （后者表示"仍在进行/未知"，锚定到起点）。
/// 都不是日期时：support 为 true 或 eol 为 false 判定仍在支持
/// 窗口（状态 1），其余组合判定已过生命周期（状态 2）。
fn resolve_end_and_status(detail: &ProductVersionDetail) -> (String, EolStatus) {
    if let Some(date) = detail.support.as_ref().and_then(LifecycleField::as_date) {
        return (date.to_string(), EolStatus::Active);
    }
    if let Some(date) = detail.eol.as_ref().and_then(LifecycleField::as_date) {
        return (date.to_string(), EolStatus::Active);
    }

    let status = match (&detail.support, &detail.eol) {
        (Some(LifecycleField::Flag(true)), _) => EolStatus::SupportOnly,
        (_, Some(LifecycleField::Flag(false))) => EolStatus::SupportOnly,
        _ => EolStatus::PastEol,
    };
    (detail.release_date.clone(), status)
}
