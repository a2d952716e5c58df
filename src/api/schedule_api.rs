// ==========================================
// 层压排产引擎 - 排产 API
// ==========================================
// 职责: 输入快照加载、边界校验、运行排产、结果导出
// 说明: 引擎只接受已校验的输入，校验在此完成
// ==========================================
// 集成约定: 结果回写由调用方负责；同一份持久化订单状态上的
// 多次运行必须串行回写（单写者），否则订单可能被重复分配
// ==========================================

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::config::ConfigManager;
use crate::domain::capacity::{ResourcePool, WorkforceMember};
use crate::domain::order::Order;
use crate::domain::plan::{Allocation, UnallocatedOrder, WorkDay};
use crate::engine::efficiency::{EfficiencyReport, ScheduleSummary};
use crate::engine::events::ScheduleEventPublisher;
use crate::engine::orchestrator::ScheduleOrchestrator;

// ==========================================
// 输入 / 输出
// ==========================================

/// 排产输入快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, alias = "molds")]
    pub resource_pools: Vec<ResourcePool>,
    #[serde(default, alias = "employees")]
    pub workforce: Vec<WorkforceMember>,
}

/// 排产响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub run_id: String,
    pub start_date: NaiveDate,
    pub daily_capacity: u32,
    pub workdays: Vec<WorkDay>,
    pub allocations: Vec<Allocation>,
    pub unallocated: Vec<UnallocatedOrder>,
    pub efficiency: EfficiencyReport,
    pub summary: ScheduleSummary,
    /// 本次运行使用的配置快照（JSON），用于复现
    pub config_snapshot: String,
}

// ==========================================
// ScheduleApi - 排产 API
// ==========================================
pub struct ScheduleApi {
    config_manager: Arc<ConfigManager>,
    orchestrator: ScheduleOrchestrator,
}

impl ScheduleApi {
    /// 创建新的 ScheduleApi 实例
    ///
    /// # 参数
    /// - config_manager: 配置管理器
    /// - event_publisher: 可选的排产事件发布者
    pub fn new(
        config_manager: Arc<ConfigManager>,
        event_publisher: Option<Arc<dyn ScheduleEventPublisher>>,
    ) -> Self {
        let orchestrator = ScheduleOrchestrator::new(config_manager.config().clone());
        let orchestrator = match event_publisher {
            Some(p) => orchestrator.with_event_publisher(p),
            None => orchestrator,
        };

        Self {
            config_manager,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &ScheduleOrchestrator {
        &self.orchestrator
    }

    // ==========================================
    // 输入加载
    // ==========================================

    /// 从 JSON 文件加载输入快照
    pub fn load_input(path: impl AsRef<Path>) -> ApiResult<ScheduleInput> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let input = Self::parse_input(&raw)?;

        info!(
            path = %path.display(),
            orders = input.orders.len(),
            resources = input.resource_pools.len(),
            workforce = input.workforce.len(),
            "输入快照加载完成"
        );
        Ok(input)
    }

    /// 从 JSON 字符串解析输入快照
    ///
    /// 空内容返回 InvalidInput，格式错误返回 Json
    pub fn parse_input(raw: &str) -> ApiResult<ScheduleInput> {
        if raw.trim().is_empty() {
            return Err(ApiError::InvalidInput("输入快照为空".to_string()));
        }
        Ok(serde_json::from_str(raw)?)
    }

    // ==========================================
    // 边界校验
    // ==========================================

    /// 校验输入快照
    ///
    /// 规则:
    /// 1) 订单ID不能为空
    /// 2) 订单ID不能重复
    /// 3) 模具ID不能重复
    /// 4) 人员产出必须为有限非负数
    /// 5) 优先级分数（如有）必须为有限数
    ///
    /// # 返回
    /// - Ok(()) 全部通过
    /// - Err(ApiError::ValidationError) 带全部违规详情
    pub fn validate_input(input: &ScheduleInput) -> ApiResult<()> {
        let mut violations = Vec::new();

        let mut order_ids: HashSet<&str> = HashSet::new();
        for (idx, order) in input.orders.iter().enumerate() {
            let field = format!("orders[{}]", idx);
            if order.order_id.trim().is_empty() {
                violations.push(ValidationViolation::new(
                    format!("{}.order_id", field),
                    "订单ID为空",
                ));
            } else if !order_ids.insert(order.order_id.as_str()) {
                violations.push(ValidationViolation::new(
                    format!("{}.order_id", field),
                    format!("订单ID重复: {}", order.order_id),
                ));
            }

            if let Some(score) = order.priority_score {
                if !score.is_finite() {
                    violations.push(ValidationViolation::new(
                        format!("{}.priority_score", field),
                        format!("优先级分数无效: {}", score),
                    ));
                }
            }
        }

        let mut resource_ids: HashSet<&str> = HashSet::new();
        for (idx, resource) in input.resource_pools.iter().enumerate() {
            if !resource_ids.insert(resource.resource_id.as_str()) {
                violations.push(ValidationViolation::new(
                    format!("resource_pools[{}].resource_id", idx),
                    format!("模具ID重复: {}", resource.resource_id),
                ));
            }
        }

        for (idx, member) in input.workforce.iter().enumerate() {
            if !member.daily_rate.is_finite() || member.daily_rate < 0.0 {
                violations.push(ValidationViolation::new(
                    format!("workforce[{}].daily_rate", idx),
                    format!("人员产出无效: {}", member.daily_rate),
                ));
            }
        }

        match ApiError::from_violations(violations) {
            Some(err) => {
                warn!(error = %err, "输入快照校验失败");
                Err(err)
            }
            None => Ok(()),
        }
    }

    // ==========================================
    // 运行排产
    // ==========================================

    /// 校验输入并执行 Allocate + Analyze
    ///
    /// # 参数
    /// - input: 输入快照
    /// - start_date: 起始日期（None 取本地当天）
    #[instrument(skip(self, input), fields(orders = input.orders.len()))]
    pub fn run_schedule(
        &self,
        input: &ScheduleInput,
        start_date: Option<NaiveDate>,
    ) -> ApiResult<ScheduleResponse> {
        Self::validate_input(input)?;

        let run = self.orchestrator.allocate_with_report(
            &input.orders,
            &input.resource_pools,
            &input.workforce,
            None,
            start_date,
        );
        let efficiency =
            self.orchestrator
                .analyze(&run.allocations, &input.orders, &input.resource_pools);
        let summary = self.orchestrator.summarize(&run, &input.orders);
        let config_snapshot = self.config_manager.get_config_snapshot()?;

        info!(
            run_id = %run.run_id,
            efficiency = efficiency.efficiency,
            "排产完成"
        );

        Ok(ScheduleResponse {
            run_id: run.run_id,
            start_date: run.start_date,
            daily_capacity: run.capacity,
            workdays: run.workdays,
            allocations: run.allocations,
            unallocated: run.unallocated,
            efficiency,
            summary,
            config_snapshot,
        })
    }

    // ==========================================
    // 结果导出
    // ==========================================

    /// 导出分配结果为 CSV
    ///
    /// 列: order_id,resource_id,scheduled_date,priority_score,reason
    pub fn export_allocations_csv<W: Write>(allocations: &[Allocation], writer: W) -> ApiResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for allocation in allocations {
            csv_writer.serialize(allocation)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// 导出分配结果到 CSV 文件
    pub fn export_allocations_csv_file(
        allocations: &[Allocation],
        path: impl AsRef<Path>,
    ) -> ApiResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::export_allocations_csv(allocations, file)?;
        info!(path = %path.display(), rows = allocations.len(), "CSV 导出完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Compatibility;

    fn input_with_orders(ids: &[&str]) -> ScheduleInput {
        let date = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
        ScheduleInput {
            orders: ids
                .iter()
                .map(|id| Order {
                    order_id: id.to_string(),
                    family: Some("fam".to_string()),
                    due_date: date,
                    priority_score: None,
                    customer: "TEST".to_string(),
                    order_date: date,
                    quantity: None,
                    features: None,
                })
                .collect(),
            resource_pools: vec![ResourcePool::new("M1", Compatibility::Universal)],
            workforce: vec![WorkforceMember::new("E1", 2.0)],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(ScheduleApi::validate_input(&input_with_orders(&["A1", "A2"])).is_ok());
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let mut input = input_with_orders(&["A1", "A1", " "]);
        input.orders[0].priority_score = Some(f64::NAN);
        input
            .resource_pools
            .push(ResourcePool::new("M1", Compatibility::Universal));
        input.workforce.push(WorkforceMember::new("E2", -1.0));

        match ScheduleApi::validate_input(&input) {
            Err(ApiError::ValidationError { violations, .. }) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec![
                        "orders[0].priority_score",
                        "orders[1].order_id",
                        "orders[2].order_id",
                        "resource_pools[1].resource_id",
                        "workforce[1].daily_rate",
                    ]
                );
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_csv_columns() {
        let allocation = Allocation {
            order_id: "A1".to_string(),
            resource_id: "M1".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            priority_score: 1.5,
            reason: "FILL_EARLIEST_DAY".to_string(),
        };

        let mut buf = Vec::new();
        ScheduleApi::export_allocations_csv(&[allocation], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("order_id,resource_id,scheduled_date,priority_score,reason")
        );
        assert_eq!(lines.next(), Some("A1,M1,2026-01-26,1.5,FILL_EARLIEST_DAY"));
    }
}
