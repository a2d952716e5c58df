// ==========================================
// 层压排产引擎 - 订单领域模型
// ==========================================
// 用途: 排产输入快照（只读），以及按产品族派生的分组
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::family_group_key;

// ==========================================
// Order - 待排产订单
// ==========================================
// 红线: 一次排产运行内不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // ===== 主键 =====
    #[serde(alias = "orderId")]
    pub order_id: String, // 订单ID（唯一）

    // ===== 排产属性 =====
    #[serde(default, alias = "stockModelId")]
    pub family: Option<String>, // 产品族（库存型号）
    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate, // 交期
    #[serde(default, alias = "priorityScore")]
    pub priority_score: Option<f64>, // 优先级分数（越小越紧急）

    // ===== 业务属性 =====
    #[serde(default)]
    pub customer: String, // 客户
    #[serde(alias = "orderDate")]
    pub order_date: NaiveDate, // 下单日期
    #[serde(default)]
    pub quantity: Option<u32>, // 数量
    #[serde(default)]
    pub features: Option<serde_json::Value>, // 配置项载荷（不参与排产）
}

impl Order {
    /// 订单所属分组键（缺失产品族归入 unknown）
    pub fn group_key(&self) -> String {
        family_group_key(self.family.as_deref())
    }

    /// 优先级分数，缺失时使用默认值
    pub fn priority_or(&self, default_priority: f64) -> f64 {
        self.priority_score.unwrap_or(default_priority)
    }
}

// ==========================================
// ProductFamilyGroup - 产品族分组（派生，不持久化）
// ==========================================
#[derive(Debug, Clone)]
pub struct ProductFamilyGroup<'a> {
    pub family: String,           // 产品族（分组键）
    pub orders: Vec<&'a Order>,   // 组内订单，按 (交期, 优先级) 升序
    pub urgent_count: usize,      // 紧急窗口内到期的订单数
    pub average_priority: f64,    // 平均优先级分数
}

impl ProductFamilyGroup<'_> {
    pub fn total_orders(&self) -> usize {
        self.orders.len()
    }
}
