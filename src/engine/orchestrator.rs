// ==========================================
// 层压排产引擎 - 引擎编排器
// ==========================================
// 用途: 对外提供 Allocate / Analyze 两个入口，协调各引擎执行顺序
// ==========================================
// 并发约定:
// - 每次运行独立构造台账，并发调用互不影响
// - 引擎不控制输入数据的并发：若多个运行基于同一份外部持久化的
//   订单/模具状态并发执行并回写结果，调用方必须串行化写入
//   （单写者），否则同一订单可能被重复分配
// - 引擎内无取消/超时；需要截止时间时由调用方限制窗口长度
// ==========================================

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::config::SchedulerConfig;
use crate::domain::capacity::{ResourcePool, WorkforceMember};
use crate::domain::order::Order;
use crate::domain::plan::Allocation;
use crate::engine::allocator::{AllocationRun, Allocator};
use crate::engine::efficiency::{EfficiencyAnalyzer, EfficiencyReport, ScheduleSummary};
use crate::engine::events::{OptionalEventPublisher, ScheduleEventPublisher};
use crate::engine::priority::PriorityScorer;

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
#[derive(Debug, Clone)]
pub struct ScheduleOrchestrator {
    config: SchedulerConfig,
    allocator: Allocator,
    analyzer: EfficiencyAnalyzer,
    scorer: PriorityScorer,
}

impl ScheduleOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 排产配置
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            allocator: Allocator::new(&config),
            analyzer: EfficiencyAnalyzer::new(
                config.efficiency_threshold_pct,
                config.underutilized_threshold_pct,
            ),
            scorer: PriorityScorer::default(),
            config,
        }
    }

    /// 注入事件发布者
    pub fn with_event_publisher(mut self, publisher: Arc<dyn ScheduleEventPublisher>) -> Self {
        self.allocator = self
            .allocator
            .with_event_publisher(OptionalEventPublisher::with_publisher(publisher));
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // ==========================================
    // 入口: Allocate
    // ==========================================

    /// 分配订单
    ///
    /// # 参数
    /// - `horizon_workdays`: 排产窗口；None 时取配置值（默认 20）
    /// - `start_date`: 起始日期；None 时取本地当天
    ///
    /// # 返回
    /// 按日期升序的分配列表；未分配订单可通过输入与输出的订单ID差集得到
    pub fn allocate(
        &self,
        orders: &[Order],
        resources: &[ResourcePool],
        workforce: &[WorkforceMember],
        horizon_workdays: Option<u32>,
        start_date: Option<NaiveDate>,
    ) -> Vec<Allocation> {
        self.allocate_with_report(orders, resources, workforce, horizon_workdays, start_date)
            .allocations
    }

    /// 分配订单（含未分配报告与运行元数据）
    #[instrument(skip(self, orders, resources, workforce), fields(
        orders = orders.len(),
        resources = resources.len(),
        workforce = workforce.len()
    ))]
    pub fn allocate_with_report(
        &self,
        orders: &[Order],
        resources: &[ResourcePool],
        workforce: &[WorkforceMember],
        horizon_workdays: Option<u32>,
        start_date: Option<NaiveDate>,
    ) -> AllocationRun {
        let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
        let horizon = horizon_workdays.unwrap_or(self.config.horizon_workdays) as usize;

        // 可选: 为缺失优先级的订单推导分数
        let orders: Cow<'_, [Order]> = if self.config.derive_missing_priorities {
            Cow::Owned(self.scorer.fill_missing(orders, start_date))
        } else {
            Cow::Borrowed(orders)
        };

        let run = self
            .allocator
            .allocate_with_report(&orders, resources, workforce, horizon, start_date);

        info!(
            run_id = %run.run_id,
            start_date = %run.start_date,
            horizon,
            allocated = run.allocations.len(),
            unallocated = run.unallocated.len(),
            "排产运行结束"
        );
        run
    }

    // ==========================================
    // 入口: Analyze
    // ==========================================

    /// 效率分析
    pub fn analyze(
        &self,
        allocations: &[Allocation],
        orders: &[Order],
        resources: &[ResourcePool],
    ) -> EfficiencyReport {
        self.analyzer.analyze(allocations, orders, resources)
    }

    /// 运行汇总
    pub fn summarize(&self, run: &AllocationRun, orders: &[Order]) -> ScheduleSummary {
        self.analyzer
            .summarize(&run.allocations, orders, &run.workdays, run.capacity)
    }
}

impl Default for ScheduleOrchestrator {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
