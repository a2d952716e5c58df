// ==========================================
// 层压排产引擎 - 贪心分配引擎
// ==========================================
// 职责: 将订单按 产品族紧急度 → 交期 → 优先级 顺序分配到 模具 × 工作日
// 红线:
// 1) 每个工作日分配数 ≤ 日产能
// 2) 分配的模具必须与订单产品族兼容
// 3) 每单最多一条分配
// 4) 不可行输入只缩小结果，不报错
// ==========================================
// 输入: 订单 + 模具 + 人员 + 窗口长度 + 起始日期
// 输出: 按日期升序的分配列表 + 未分配订单报告
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ResourceCapacityMode, SchedulerConfig};
use crate::domain::capacity::{ResourcePool, WorkforceMember};
use crate::domain::order::Order;
use crate::domain::plan::{Allocation, UnallocatedOrder, UnallocatedReason, WorkDay};
use crate::engine::calendar::CalendarGenerator;
use crate::engine::capacity::CapacityModel;
use crate::engine::classifier::OrderClassifier;
use crate::engine::compatibility::CompatibilityResolver;
use crate::engine::events::{OptionalEventPublisher, ScheduleEvent, ScheduleEventType};

// ==========================================
// AllocationLedger - 单次运行的计数台账
// ==========================================
// 每次运行独立构造，不跨运行共享
#[derive(Debug, Clone)]
pub struct AllocationLedger {
    capacity: u32,
    day_counts: Vec<u32>,           // [工作日] → 已分配数
    resource_usage: Vec<Vec<u32>>,  // [工作日][模具下标] → 已分配数
}

impl AllocationLedger {
    pub fn new(workday_count: usize, resource_count: usize, capacity: u32) -> Self {
        Self {
            capacity,
            day_counts: vec![0; workday_count],
            resource_usage: vec![vec![0; resource_count]; workday_count],
        }
    }

    /// 当日是否还有剩余产能
    pub fn has_room(&self, day: usize) -> bool {
        self.day_counts[day] < self.capacity
    }

    pub fn day_count(&self, day: usize) -> u32 {
        self.day_counts[day]
    }

    pub fn usage(&self, day: usize, resource: usize) -> u32 {
        self.resource_usage[day][resource]
    }

    /// 记账：当日计数 +1，模具当日使用量 +1
    pub fn record(&mut self, day: usize, resource: usize) {
        self.day_counts[day] += 1;
        self.resource_usage[day][resource] += 1;
    }
}

// ==========================================
// AllocationRun - 单次分配运行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRun {
    pub run_id: String,                    // 运行ID（UUID v4）
    pub start_date: NaiveDate,             // 起始日期（紧急窗口基准）
    pub capacity: u32,                     // 日产能
    pub workdays: Vec<WorkDay>,            // 排产窗口
    pub allocations: Vec<Allocation>,      // 分配结果（按日期升序）
    pub unallocated: Vec<UnallocatedOrder>, // 未分配订单（按处理顺序）
}

// ==========================================
// Allocator - 贪心分配引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct Allocator {
    classifier: OrderClassifier,
    capacity_model: CapacityModel,
    resolver: CompatibilityResolver,
    calendar: CalendarGenerator,
    default_priority: f64,
    resource_capacity_mode: ResourceCapacityMode,
    event_publisher: OptionalEventPublisher,
}

impl Allocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 排产配置（工作日模式、紧急窗口、默认优先级、模具产能模式）
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            classifier: OrderClassifier::new(config.urgent_window_days, config.default_priority),
            capacity_model: CapacityModel::new(),
            resolver: CompatibilityResolver::new(),
            calendar: CalendarGenerator::new(config.workdays.clone()),
            default_priority: config.default_priority,
            resource_capacity_mode: config.resource_capacity_mode,
            event_publisher: OptionalEventPublisher::none(),
        }
    }

    /// 注入事件发布者
    pub fn with_event_publisher(mut self, publisher: OptionalEventPublisher) -> Self {
        self.event_publisher = publisher;
        self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配订单（只返回分配列表）
    pub fn allocate(
        &self,
        orders: &[Order],
        resources: &[ResourcePool],
        workforce: &[WorkforceMember],
        horizon_workdays: usize,
        start_date: NaiveDate,
    ) -> Vec<Allocation> {
        self.allocate_with_report(orders, resources, workforce, horizon_workdays, start_date)
            .allocations
    }

    /// 分配订单（含未分配报告与运行元数据）
    ///
    /// 步骤:
    /// 1) 分类 + 日产能 + 工作日历
    /// 2) 初始化台账
    /// 3) 按分组顺序、组内顺序逐单处理
    /// 4) 无兼容模具 → 未分配（分组级告警）
    /// 5) 按时间扫描工作日，首个有余量的日子选当日使用最少的兼容模具
    /// 6) 窗口内无余量 → 未分配
    /// 7) 按日期稳定排序
    #[instrument(skip_all, fields(
        orders = orders.len(),
        resources = resources.len(),
        workforce = workforce.len(),
        horizon_workdays = horizon_workdays,
        start_date = %start_date
    ))]
    pub fn allocate_with_report(
        &self,
        orders: &[Order],
        resources: &[ResourcePool],
        workforce: &[WorkforceMember],
        horizon_workdays: usize,
        start_date: NaiveDate,
    ) -> AllocationRun {
        let run_id = Uuid::new_v4().to_string();

        // 1. 分类 + 日产能 + 工作日历（三者互不依赖）
        let groups = self.classifier.classify(orders, start_date);
        let capacity = self.capacity_model.daily_capacity(resources, workforce);
        let workdays = self.calendar.generate(start_date, horizon_workdays);

        info!(
            run_id = %run_id,
            capacity,
            group_count = groups.len(),
            workday_count = workdays.len(),
            "开始分配"
        );
        self.event_publisher.publish(ScheduleEvent::run_level(
            &run_id,
            ScheduleEventType::RunStarted,
            format!(
                "capacity={}, groups={}, workdays={}",
                capacity,
                groups.len(),
                workdays.len()
            ),
        ));

        // 2. 台账
        let mut ledger = AllocationLedger::new(workdays.len(), resources.len(), capacity);
        let mut allocations: Vec<Allocation> = Vec::with_capacity(orders.len());
        let mut unallocated: Vec<UnallocatedOrder> = Vec::new();

        // 3. 按分组顺序处理
        for group in &groups {
            debug!(
                family = %group.family,
                total = group.total_orders(),
                urgent = group.urgent_count,
                "处理产品族分组"
            );

            let mut without_resources = 0usize;

            for order in &group.orders {
                // 4. 兼容模具
                let compatible = self
                    .resolver
                    .compatible_indices(order.family.as_deref(), resources);

                if compatible.is_empty() {
                    without_resources += 1;
                    self.mark_unallocated(
                        &run_id,
                        order,
                        &group.family,
                        UnallocatedReason::NoCompatibleResource,
                        &mut unallocated,
                    );
                    continue;
                }

                // 5. 最早有余量的工作日
                match self.place(&compatible, resources, &workdays, &ledger) {
                    Some((day, resource_idx)) => {
                        ledger.record(day, resource_idx);
                        let resource = &resources[resource_idx];
                        let date = workdays[day].date;
                        let priority = order.priority_or(self.default_priority);

                        self.event_publisher.publish(
                            ScheduleEvent::order_level(
                                &run_id,
                                ScheduleEventType::OrderAllocated,
                                &order.order_id,
                                &group.family,
                            )
                            .with_resource(&resource.resource_id, date),
                        );

                        allocations.push(Allocation {
                            order_id: order.order_id.clone(),
                            resource_id: resource.resource_id.clone(),
                            scheduled_date: date,
                            priority_score: priority,
                            reason: format!(
                                "FILL_EARLIEST_DAY: family={}, priority={}, due={}",
                                group.family, priority, order.due_date
                            ),
                        });
                    }
                    // 6. 窗口耗尽
                    None => self.mark_unallocated(
                        &run_id,
                        order,
                        &group.family,
                        UnallocatedReason::HorizonExhausted,
                        &mut unallocated,
                    ),
                }
            }

            if without_resources > 0 {
                warn!(
                    family = %group.family,
                    orders = without_resources,
                    "产品族无兼容模具，订单未分配"
                );
                self.event_publisher.publish(ScheduleEvent::run_level(
                    &run_id,
                    ScheduleEventType::GroupWithoutResources,
                    format!("family={}, orders={}", group.family, without_resources),
                ));
            }
        }

        // 7. 按日期稳定排序
        allocations.sort_by_key(|a| a.scheduled_date);

        info!(
            run_id = %run_id,
            allocated = allocations.len(),
            unallocated = unallocated.len(),
            "分配完成"
        );
        self.event_publisher.publish(ScheduleEvent::run_level(
            &run_id,
            ScheduleEventType::RunCompleted,
            format!(
                "allocated={}, unallocated={}",
                allocations.len(),
                unallocated.len()
            ),
        ));

        AllocationRun {
            run_id,
            start_date,
            capacity,
            workdays,
            allocations,
            unallocated,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 查找首个有余量的工作日及当日使用最少的兼容模具
    ///
    /// 同使用量时取输入列表中靠前的模具。
    /// Enforced 模式下跳过当日已达 daily_capacity 的模具。
    fn place(
        &self,
        compatible: &[usize],
        resources: &[ResourcePool],
        workdays: &[WorkDay],
        ledger: &AllocationLedger,
    ) -> Option<(usize, usize)> {
        (0..workdays.len())
            .filter(|&day| ledger.has_room(day))
            .find_map(|day| {
                compatible
                    .iter()
                    .copied()
                    .filter(|&idx| self.resource_has_room(&resources[idx], ledger.usage(day, idx)))
                    .min_by_key(|&idx| (ledger.usage(day, idx), idx))
                    .map(|idx| (day, idx))
            })
    }

    fn resource_has_room(&self, resource: &ResourcePool, used: u32) -> bool {
        match (self.resource_capacity_mode, resource.daily_capacity) {
            (ResourceCapacityMode::Enforced, Some(limit)) => used < limit,
            _ => true,
        }
    }

    fn mark_unallocated(
        &self,
        run_id: &str,
        order: &Order,
        family: &str,
        reason: UnallocatedReason,
        unallocated: &mut Vec<UnallocatedOrder>,
    ) {
        debug!(order_id = %order.order_id, family, %reason, "订单未分配");
        self.event_publisher.publish(
            ScheduleEvent::order_level(
                run_id,
                ScheduleEventType::OrderUnallocated,
                &order.order_id,
                family,
            )
            .with_detail(reason.to_string()),
        );
        unallocated.push(UnallocatedOrder {
            order_id: order.order_id.clone(),
            family: family.to_string(),
            reason,
        });
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Compatibility;
    use crate::engine::events::CollectingEventPublisher;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Arc;

    // 2026-01-19 是周一
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
    }

    fn order(id: &str, family: Option<&str>, due_in_days: i64) -> Order {
        Order {
            order_id: id.to_string(),
            family: family.map(str::to_string),
            due_date: monday() + Duration::days(due_in_days),
            priority_score: None,
            customer: "TEST".to_string(),
            order_date: monday() - Duration::days(14),
            quantity: None,
            features: None,
        }
    }

    fn pool(id: &str, families: &[&str]) -> ResourcePool {
        ResourcePool::new(id, Compatibility::from_families(families.iter().copied()))
    }

    fn crew(rate: f64) -> Vec<WorkforceMember> {
        vec![WorkforceMember::new("E1", rate)]
    }

    #[test]
    fn test_ledger_counts() {
        let mut ledger = AllocationLedger::new(2, 2, 1);
        assert!(ledger.has_room(0));
        ledger.record(0, 1);
        assert!(!ledger.has_room(0));
        assert_eq!(ledger.day_count(0), 1);
        assert_eq!(ledger.usage(0, 1), 1);
        assert_eq!(ledger.usage(1, 1), 0);
    }

    #[test]
    fn test_least_used_resource_with_index_tiebreak() {
        let allocator = Allocator::default();
        let orders: Vec<Order> = (0..4).map(|i| order(&format!("O{}", i), Some("fam"), 30)).collect();
        let pools = vec![pool("M1", &[]), pool("M2", &[])];

        let allocations = allocator.allocate(&orders, &pools, &crew(4.0), 1, monday());
        let molds: Vec<&str> = allocations.iter().map(|a| a.resource_id.as_str()).collect();
        assert_eq!(molds, vec!["M1", "M2", "M1", "M2"]);
    }

    #[test]
    fn test_allocations_sorted_by_date() {
        let allocator = Allocator::default();
        // 第一组紧急订单占满第一天，第二组落到后续日期
        let orders = vec![
            order("R1", Some("relaxed"), 40),
            order("U1", Some("urgent"), 1),
            order("U2", Some("urgent"), 2),
        ];
        let pools = vec![pool("M1", &[])];

        let allocations = allocator.allocate(&orders, &pools, &crew(2.0), 5, monday());
        let ids: Vec<&str> = allocations.iter().map(|a| a.order_id.as_str()).collect();
        assert_eq!(ids, vec!["U1", "U2", "R1"]);
        assert!(allocations.windows(2).all(|w| w[0].scheduled_date <= w[1].scheduled_date));
    }

    #[test]
    fn test_missing_family_never_allocated() {
        let allocator = Allocator::default();
        let orders = vec![order("A1", None, 5), order("A2", Some(""), 5)];
        let pools = vec![pool("M1", &[])];

        let run = allocator.allocate_with_report(&orders, &pools, &crew(5.0), 4, monday());
        assert!(run.allocations.is_empty());
        assert_eq!(run.unallocated.len(), 2);
        assert!(run
            .unallocated
            .iter()
            .all(|u| u.reason == UnallocatedReason::NoCompatibleResource && u.family == "unknown"));
    }

    #[test]
    fn test_horizon_exhausted_reported() {
        let allocator = Allocator::default();
        let orders: Vec<Order> = (0..3).map(|i| order(&format!("O{}", i), Some("fam"), 3)).collect();
        let pools = vec![pool("M1", &[])];

        let run = allocator.allocate_with_report(&orders, &pools, &crew(1.0), 2, monday());
        assert_eq!(run.allocations.len(), 2);
        assert_eq!(run.unallocated.len(), 1);
        assert_eq!(run.unallocated[0].reason, UnallocatedReason::HorizonExhausted);
    }

    #[test]
    fn test_zero_horizon_yields_empty() {
        let allocator = Allocator::default();
        let orders = vec![order("A1", Some("fam"), 3)];
        let run = allocator.allocate_with_report(&orders, &[pool("M1", &[])], &crew(3.0), 0, monday());
        assert!(run.allocations.is_empty());
        assert!(run.workdays.is_empty());
    }

    #[test]
    fn test_enforced_resource_capacity() {
        let mut config = SchedulerConfig::default();
        config.resource_capacity_mode = ResourceCapacityMode::Enforced;
        let allocator = Allocator::new(&config);

        let mut limited = pool("M1", &[]);
        limited.daily_capacity = Some(1);
        let orders: Vec<Order> = (0..3).map(|i| order(&format!("O{}", i), Some("fam"), 10)).collect();

        let allocations = allocator.allocate(&orders, &[limited.clone()], &crew(3.0), 3, monday());
        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        for a in &allocations {
            *per_day.entry(a.scheduled_date).or_default() += 1;
        }
        assert_eq!(allocations.len(), 3);
        assert!(per_day.values().all(|&n| n == 1));

        // 默认模式下忽略模具产能，全部落在第一天
        let ignored = Allocator::default().allocate(&orders, &[limited], &crew(3.0), 3, monday());
        assert!(ignored.iter().all(|a| a.scheduled_date == monday()));
    }

    #[test]
    fn test_events_published() {
        let collector = Arc::new(CollectingEventPublisher::new());
        let allocator = Allocator::default()
            .with_event_publisher(OptionalEventPublisher::with_publisher(collector.clone()));

        let orders = vec![order("A1", Some("X"), 3), order("A2", Some("Y"), 3)];
        let pools = vec![pool("M1", &["Y"])];
        let run = allocator.allocate_with_report(&orders, &pools, &crew(2.0), 2, monday());

        assert_eq!(collector.count(ScheduleEventType::RunStarted), 1);
        assert_eq!(collector.count(ScheduleEventType::RunCompleted), 1);
        assert_eq!(collector.count(ScheduleEventType::OrderAllocated), 1);
        assert_eq!(collector.count(ScheduleEventType::OrderUnallocated), 1);
        assert_eq!(collector.count(ScheduleEventType::GroupWithoutResources), 1);
        assert!(collector.events().iter().all(|e| e.run_id == run.run_id));
    }
}
