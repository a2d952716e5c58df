// ==========================================
// 层压排产引擎 - 日产能模型
// ==========================================
// 职责: 由在岗人员产出推导每个工作日可开工订单数
// 红线: 人员产出是约束条件，模具 daily_capacity 不参与此计算
// ==========================================

use tracing::{debug, instrument};

use crate::domain::capacity::{ResourcePool, WorkforceMember};

// ==========================================
// CapacityModel - 日产能模型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CapacityModel {
    // 无状态引擎
}

impl CapacityModel {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算日产能（订单/天）
    ///
    /// 规则:
    /// 1) 启用模具或在岗人员任一为空 → 0
    /// 2) 否则 floor(在岗人员 daily_rate 之和)
    ///
    /// 非有限或为负的合计按 0 处理。
    #[instrument(skip_all, fields(resources = resources.len(), workforce = workforce.len()))]
    pub fn daily_capacity(&self, resources: &[ResourcePool], workforce: &[WorkforceMember]) -> u32 {
        let enabled_resources = resources.iter().filter(|r| r.enabled).count();
        let active_members: Vec<&WorkforceMember> = workforce.iter().filter(|m| m.active).collect();

        if enabled_resources == 0 || active_members.is_empty() {
            debug!(
                enabled_resources,
                active_members = active_members.len(),
                "无启用模具或在岗人员，日产能为 0"
            );
            return 0;
        }

        let total_rate: f64 = active_members.iter().map(|m| m.daily_rate).sum();
        if !total_rate.is_finite() || total_rate <= 0.0 {
            return 0;
        }

        let capacity = total_rate.floor().min(u32::MAX as f64) as u32;
        debug!(total_rate, capacity, "日产能计算完成");
        capacity
    }
}
