// ==========================================
// 层压排产引擎 - 排产效率分析
// ==========================================
// 职责: 排产率、模具利用率、建议、排产汇总
// 红线: 只读分析，不修改分配结果
// ==========================================

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::capacity::ResourcePool;
use crate::domain::order::Order;
use crate::domain::plan::{Allocation, WorkDay};
use crate::domain::types::MaterialType;

pub const RECOMMEND_EXPAND_CAPACITY: &str =
    "Consider increasing daily capacity or extending schedule window";
pub const RECOMMEND_WELL_OPTIMIZED: &str = "Schedule is well-optimized";

// ==========================================
// 分析结果
// ==========================================

/// 效率报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub efficiency: f64,                                // 排产率（%）
    pub utilization_by_resource: BTreeMap<String, f64>, // 模具ID → 利用率（%）
    pub recommendations: Vec<String>,                   // 建议
}

/// 单日负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub allocated: usize,
    pub capacity: u32,
}

/// 产品族负载
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyLoad {
    pub total_orders: usize,
    pub scheduled_orders: usize,
}

/// 已分配订单的材料构成（按产品族前缀）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBreakdown {
    pub cf: usize,
    pub fg: usize,
    pub unknown: usize,
}

impl MaterialBreakdown {
    fn record(&mut self, material: MaterialType) {
        match material {
            MaterialType::Cf => self.cf += 1,
            MaterialType::Fg => self.fg += 1,
            MaterialType::Unknown => self.unknown += 1,
        }
    }
}

/// 排产汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_orders: usize,
    pub scheduled_orders: usize,
    pub unscheduled_orders: usize,
    pub workday_count: usize,
    pub daily_capacity: u32,
    pub theoretical_max: u64,                            // 工作日数 × 日产能
    pub daily_breakdown: Vec<DailyLoad>,                 // 按日期升序
    pub capacity_violations: usize,                      // 分配数超过日产能的天数
    pub family_breakdown: BTreeMap<String, FamilyLoad>, // 分组键 → 负载
    pub material_breakdown: MaterialBreakdown,          // 已分配订单的材料构成
}

// ==========================================
// EfficiencyAnalyzer - 排产效率分析器
// ==========================================
#[derive(Debug, Clone)]
pub struct EfficiencyAnalyzer {
    efficiency_threshold_pct: f64,
    underutilized_threshold_pct: f64,
}

impl EfficiencyAnalyzer {
    /// 构造函数
    ///
    /// # 参数
    /// - `efficiency_threshold_pct`: 排产率低于此值时建议扩容
    /// - `underutilized_threshold_pct`: 模具利用率低于此值时列为低利用
    pub fn new(efficiency_threshold_pct: f64, underutilized_threshold_pct: f64) -> Self {
        Self {
            efficiency_threshold_pct,
            underutilized_threshold_pct,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 效率分析
    ///
    /// 规则:
    /// 1) efficiency = 100 × 分配数 / 订单数（无订单 → 0）
    /// 2) 均值 = 分配数 / 启用模具数；利用率 = 使用量 / 均值 × 100（均值为 0 → 0）
    /// 3) 排产率低于阈值 → 扩容建议
    /// 4) 存在低利用模具 → 列出模具ID
    /// 5) 以上均未触发 → 单条 "well-optimized"
    ///
    /// 利用率表包含全部输入模具（含停用模具），均值只按启用模具计算。
    #[instrument(skip_all, fields(
        allocations = allocations.len(),
        orders = orders.len(),
        resources = resources.len()
    ))]
    pub fn analyze(
        &self,
        allocations: &[Allocation],
        orders: &[Order],
        resources: &[ResourcePool],
    ) -> EfficiencyReport {
        // 1. 排产率
        let efficiency = if orders.is_empty() {
            0.0
        } else {
            100.0 * allocations.len() as f64 / orders.len() as f64
        };

        // 2. 模具利用率
        let mut usage: HashMap<&str, usize> = HashMap::new();
        for allocation in allocations {
            *usage.entry(allocation.resource_id.as_str()).or_default() += 1;
        }

        let enabled_count = resources.iter().filter(|r| r.enabled).count();
        let mean_usage = if enabled_count == 0 {
            0.0
        } else {
            allocations.len() as f64 / enabled_count as f64
        };

        let mut utilization_by_resource = BTreeMap::new();
        let mut underutilized: Vec<&str> = Vec::new();
        for resource in resources {
            let used = usage.get(resource.resource_id.as_str()).copied().unwrap_or(0);
            let utilization = if mean_usage > 0.0 {
                used as f64 / mean_usage * 100.0
            } else {
                0.0
            };
            if utilization < self.underutilized_threshold_pct
                && !underutilized.contains(&resource.resource_id.as_str())
            {
                underutilized.push(resource.resource_id.as_str());
            }
            utilization_by_resource.insert(resource.resource_id.clone(), utilization);
        }

        // 3. 建议
        let mut recommendations = Vec::new();
        if efficiency < self.efficiency_threshold_pct {
            recommendations.push(RECOMMEND_EXPAND_CAPACITY.to_string());
        }
        if !underutilized.is_empty() {
            recommendations.push(format!("Underutilized molds: {}", underutilized.join(", ")));
        }
        if recommendations.is_empty() {
            recommendations.push(RECOMMEND_WELL_OPTIMIZED.to_string());
        }

        debug!(efficiency, recommendation_count = recommendations.len(), "效率分析完成");
        EfficiencyReport {
            efficiency,
            utilization_by_resource,
            recommendations,
        }
    }

    /// 排产汇总
    ///
    /// # 参数
    /// - `allocations`: 分配结果（可为外部编辑后的结果）
    /// - `orders`: 原始订单
    /// - `workdays`: 排产窗口
    /// - `daily_capacity`: 日产能
    ///
    /// # 返回
    /// ScheduleSummary；`capacity_violations` 对引擎输出恒为 0
    #[instrument(skip_all, fields(allocations = allocations.len(), workdays = workdays.len()))]
    pub fn summarize(
        &self,
        allocations: &[Allocation],
        orders: &[Order],
        workdays: &[WorkDay],
        daily_capacity: u32,
    ) -> ScheduleSummary {
        // 1. 按日统计（窗口内无分配的日子记 0）
        let mut per_day: BTreeMap<NaiveDate, usize> =
            workdays.iter().map(|w| (w.date, 0)).collect();
        for allocation in allocations {
            *per_day.entry(allocation.scheduled_date).or_default() += 1;
        }

        let daily_breakdown: Vec<DailyLoad> = per_day
            .into_iter()
            .map(|(date, allocated)| DailyLoad {
                date,
                allocated,
                capacity: daily_capacity,
            })
            .collect();
        let capacity_violations = daily_breakdown
            .iter()
            .filter(|d| d.allocated > daily_capacity as usize)
            .count();

        // 2. 按产品族统计
        let allocated_ids: HashSet<&str> = allocations.iter().map(|a| a.order_id.as_str()).collect();
        let mut family_breakdown: BTreeMap<String, FamilyLoad> = BTreeMap::new();
        let mut scheduled_orders = 0usize;
        for order in orders {
            let load = family_breakdown.entry(order.group_key()).or_default();
            load.total_orders += 1;
            if allocated_ids.contains(order.order_id.as_str()) {
                load.scheduled_orders += 1;
                scheduled_orders += 1;
            }
        }

        // 3. 材料构成（分配中找不到订单的记为 unknown）
        let family_by_id: HashMap<&str, Option<&str>> = orders
            .iter()
            .map(|o| (o.order_id.as_str(), o.family.as_deref()))
            .collect();
        let mut material_breakdown = MaterialBreakdown::default();
        for allocation in allocations {
            let family = family_by_id
                .get(allocation.order_id.as_str())
                .copied()
                .flatten();
            material_breakdown.record(MaterialType::from_family(family));
        }

        ScheduleSummary {
            total_orders: orders.len(),
            scheduled_orders,
            unscheduled_orders: orders.len() - scheduled_orders,
            workday_count: workdays.len(),
            daily_capacity,
            theoretical_max: workdays.len() as u64 * daily_capacity as u64,
            daily_breakdown,
            capacity_violations,
            family_breakdown,
            material_breakdown,
        }
    }
}

impl Default for EfficiencyAnalyzer {
    fn default() -> Self {
        Self::new(80.0, 50.0)
    }
}
