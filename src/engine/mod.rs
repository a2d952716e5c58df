// ==========================================
// 层压排产引擎 - 引擎层
// ==========================================
// 职责: 实现排产规则引擎，不做 I/O
// 红线: 引擎不抛错，不可行输入只缩小结果；所有分配必须输出 reason
// ==========================================

pub mod allocator;
pub mod calendar;
pub mod capacity;
pub mod classifier;
pub mod compatibility;
pub mod efficiency;
pub mod events;
pub mod orchestrator;
pub mod priority;

// 重导出核心引擎
pub use allocator::{AllocationLedger, AllocationRun, Allocator};
pub use calendar::CalendarGenerator;
pub use capacity::CapacityModel;
pub use classifier::OrderClassifier;
pub use compatibility::CompatibilityResolver;
pub use efficiency::{
    DailyLoad, EfficiencyAnalyzer, EfficiencyReport, FamilyLoad, MaterialBreakdown, ScheduleSummary,
};
pub use events::{
    CollectingEventPublisher, NoOpEventPublisher, OptionalEventPublisher, ScheduleEvent,
    ScheduleEventPublisher, ScheduleEventType, TracingEventPublisher,
};
pub use orchestrator::ScheduleOrchestrator;
pub use priority::{PriorityAssessment, PriorityScorer};
