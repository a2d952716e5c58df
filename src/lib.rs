// ==========================================
// 层压排产引擎 - 核心库
// ==========================================
// 职责: 订单 → 模具 → 工作日 的产能分配与效率分析
// 系统定位: 纯计算引擎（无持久化、无网络），结果由调用方落库
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排产规则
pub mod engine;

// 配置层 - 排产配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 输入校验与运行
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Compatibility, MaterialType, OrderType, UrgencyLevel, WorkdayPattern};

// 领域实体
pub use domain::{
    Allocation, Order, ProductFamilyGroup, ResourcePool, UnallocatedOrder, UnallocatedReason,
    WorkDay, WorkforceMember,
};

// 引擎
pub use engine::{
    AllocationRun, Allocator, CalendarGenerator, CapacityModel, CompatibilityResolver,
    EfficiencyAnalyzer, EfficiencyReport, OrderClassifier, PriorityScorer, ScheduleOrchestrator,
    ScheduleSummary,
};

// 配置
pub use config::{ConfigManager, ResourceCapacityMode, SchedulerConfig};

// API
pub use api::{ApiError, ApiResult, ScheduleApi, ScheduleInput, ScheduleResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "层压排产引擎";
