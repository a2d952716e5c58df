// ==========================================
// 层压排产引擎 - 产能资源领域模型
// ==========================================
// 用途: 模具（资源池）与人员（产能来源）
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::Compatibility;

fn default_true() -> bool {
    true
}

// ==========================================
// ResourcePool - 模具 / 资源池
// ==========================================
// 待定问题: daily_capacity 当前不参与 CapacityModel 的日产能计算，
// 日产能仅由人员产出决定。是否应取人员与模具产能的较小值尚未确认，
// 仅当 ResourceCapacityMode::Enforced 时由分配器按模具逐日限流。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    #[serde(alias = "moldId")]
    pub resource_id: String, // 模具ID
    #[serde(default, alias = "modelName")]
    pub name: String, // 显示名称
    #[serde(default, alias = "stockModels")]
    pub compatibility: Compatibility, // 兼容产品族
    #[serde(default = "default_true")]
    pub enabled: bool, // 是否启用
    #[serde(default, alias = "dailyCapacity")]
    pub daily_capacity: Option<u32>, // 模具日产能（见上方待定问题）
}

impl ResourcePool {
    pub fn new(resource_id: &str, compatibility: Compatibility) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            name: resource_id.to_string(),
            compatibility,
            enabled: true,
            daily_capacity: None,
        }
    }
}

// ==========================================
// WorkforceMember - 人员
// ==========================================
// daily_rate 单位: 订单/天
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceMember {
    #[serde(alias = "employeeId")]
    pub member_id: String, // 人员ID
    #[serde(default)]
    pub name: String, // 显示名称
    #[serde(alias = "rate")]
    pub daily_rate: f64, // 日产出（订单/天）
    #[serde(default = "default_true", alias = "isActive")]
    pub active: bool, // 是否在岗
}

impl WorkforceMember {
    pub fn new(member_id: &str, daily_rate: f64) -> Self {
        Self {
            member_id: member_id.to_string(),
            name: member_id.to_string(),
            daily_rate,
            active: true,
        }
    }
}
