use serde::{Deserialize, Serialize};

use crate::domain::types::WorkdayPattern;

/// 排产窗口上限（工作日数），约 20 年的周一至周四
pub const MAX_HORIZON_WORKDAYS: u32 = 4_000;

/// 紧急窗口上限（天）
pub const MAX_URGENT_WINDOW_DAYS: i64 = 3_650;

/// 模具日产能处理方式
///
/// 待定问题：模具日产能是否构成约束尚未确认。
/// 默认 `Ignored`，日产能仅由人员产出决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCapacityMode {
    /// 忽略模具 daily_capacity
    #[default]
    Ignored,
    /// 模具当日使用量达到 daily_capacity 后不再分配
    Enforced,
}

/// 排产配置
///
/// 所有字段均有默认值，配置文件只需写出需要覆写的键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 排产窗口（工作日数），默认 20（4 周 × 4 天）
    pub horizon_workdays: u32,

    /// 允许排产的星期，默认周一至周四
    pub workdays: WorkdayPattern,

    /// 紧急窗口（天），交期在 start + N 天内视为紧急
    pub urgent_window_days: i64,

    /// 缺失优先级分数时的默认值
    pub default_priority: f64,

    /// 模具日产能处理方式
    pub resource_capacity_mode: ResourceCapacityMode,

    /// 排产率低于该阈值（%）时建议扩容
    pub efficiency_threshold_pct: f64,

    /// 模具利用率低于该阈值（%）时列为低利用
    pub underutilized_threshold_pct: f64,

    /// 是否为缺失优先级的订单推导分数（PriorityScorer）
    pub derive_missing_priorities: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_workdays: 20,
            workdays: WorkdayPattern::monday_to_thursday(),
            urgent_window_days: 7,
            default_priority: 1.0,
            resource_capacity_mode: ResourceCapacityMode::Ignored,
            efficiency_threshold_pct: 80.0,
            underutilized_threshold_pct: 50.0,
            derive_missing_priorities: false,
        }
    }
}
