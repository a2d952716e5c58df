// ==========================================
// 层压排产引擎 - 配置层
// ==========================================
// 职责: 排产配置定义、加载与覆写
// ==========================================

pub mod config_manager;
pub mod scheduler_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use scheduler_config::{
    ResourceCapacityMode, SchedulerConfig, MAX_HORIZON_WORKDAYS, MAX_URGENT_WINDOW_DAYS,
};
