// ==========================================
// 层压排产引擎 - API 层
// ==========================================
// 职责: 提供排产 API 接口，供命令行及外部系统调用
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use schedule_api::{ScheduleApi, ScheduleInput, ScheduleResponse};
