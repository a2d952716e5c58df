// ==========================================
// 层压排产引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、兼容性规则
// 红线: 不含引擎逻辑,不含 I/O
// ==========================================

pub mod capacity;
pub mod order;
pub mod plan;
pub mod types;

// 重导出核心类型
pub use capacity::{ResourcePool, WorkforceMember};
pub use order::{Order, ProductFamilyGroup};
pub use plan::{Allocation, UnallocatedOrder, UnallocatedReason, WorkDay};
pub use types::{
    family_group_key, normalize_family, Compatibility, MaterialType, OrderType, UrgencyLevel,
    WorkdayPattern, UNIVERSAL_MARKER, UNKNOWN_FAMILY,
};
