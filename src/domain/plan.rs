// ==========================================
// 层压排产引擎 - 排产结果领域模型
// ==========================================
// 用途: 工作日、分配记录、未分配订单
// 红线: Allocation 仅由 Allocator 生成，生成后不可变；每单最多一条
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// WorkDay - 可排产工作日
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkDay {
    pub date: NaiveDate,
}

impl WorkDay {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.date, self.date.weekday())
    }
}

// ==========================================
// Allocation - 分配记录（订单 → 模具 → 工作日）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub order_id: String,          // 订单ID
    pub resource_id: String,       // 模具ID
    pub scheduled_date: NaiveDate, // 排产日期
    pub priority_score: f64,       // 分配时的优先级快照
    pub reason: String,            // 分配原因（可解释性）
}

// ==========================================
// 未分配原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnallocatedReason {
    NoCompatibleResource, // 无兼容模具（含产品族缺失）
    HorizonExhausted,     // 排产窗口内所有工作日均已满
}

impl fmt::Display for UnallocatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnallocatedReason::NoCompatibleResource => write!(f, "NO_COMPATIBLE_RESOURCE"),
            UnallocatedReason::HorizonExhausted => write!(f, "HORIZON_EXHAUSTED"),
        }
    }
}

/// 未分配订单（软失败，不抛错）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnallocatedOrder {
    pub order_id: String,
    pub family: String,
    pub reason: UnallocatedReason,
}
