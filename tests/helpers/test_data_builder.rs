// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use layup_scheduler::domain::capacity::{ResourcePool, WorkforceMember};
use layup_scheduler::domain::order::Order;
use layup_scheduler::domain::types::Compatibility;

/// 测试基准日期（2026-01-19，周一）
pub fn base_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
}

// ==========================================
// Order 构建器
// ==========================================

pub struct OrderBuilder {
    order_id: String,
    family: Option<String>,
    due_date: NaiveDate,
    priority_score: Option<f64>,
    customer: String,
    order_date: NaiveDate,
    quantity: Option<u32>,
}

impl OrderBuilder {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            family: None,
            due_date: base_monday() + Duration::days(30),
            priority_score: None,
            customer: "CUST001".to_string(),
            order_date: base_monday() - Duration::days(14),
            quantity: None,
        }
    }

    pub fn family(mut self, family: &str) -> Self {
        self.family = Some(family.to_string());
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = date;
        self
    }

    /// 交期 = 基准周一 + days
    pub fn due_in_days(mut self, days: i64) -> Self {
        self.due_date = base_monday() + Duration::days(days);
        self
    }

    pub fn priority(mut self, score: f64) -> Self {
        self.priority_score = Some(score);
        self
    }

    pub fn customer(mut self, customer: &str) -> Self {
        self.customer = customer.to_string();
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn build(self) -> Order {
        Order {
            order_id: self.order_id,
            family: self.family,
            due_date: self.due_date,
            priority_score: self.priority_score,
            customer: self.customer,
            order_date: self.order_date,
            quantity: self.quantity,
            features: None,
        }
    }
}

// ==========================================
// ResourcePool 构建器
// ==========================================

pub struct ResourceBuilder {
    resource_id: String,
    name: String,
    families: Vec<String>,
    enabled: bool,
    daily_capacity: Option<u32>,
}

impl ResourceBuilder {
    pub fn new(resource_id: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            name: format!("Mold {}", resource_id),
            families: Vec::new(),
            enabled: true,
            daily_capacity: None,
        }
    }

    /// 追加支持的产品族（不调用则为通用模具）
    pub fn supports(mut self, family: &str) -> Self {
        self.families.push(family.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn daily_capacity(mut self, capacity: u32) -> Self {
        self.daily_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> ResourcePool {
        let mut pool = ResourcePool::new(&self.resource_id, Compatibility::from_families(self.families));
        pool.name = self.name;
        pool.enabled = self.enabled;
        pool.daily_capacity = self.daily_capacity;
        pool
    }
}

// ==========================================
// WorkforceMember 构建器
// ==========================================

pub struct WorkforceBuilder {
    member_id: String,
    daily_rate: f64,
    active: bool,
}

impl WorkforceBuilder {
    pub fn new(member_id: &str) -> Self {
        Self {
            member_id: member_id.to_string(),
            daily_rate: 1.0,
            active: true,
        }
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.daily_rate = rate;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn build(self) -> WorkforceMember {
        let mut member = WorkforceMember::new(&self.member_id, self.daily_rate);
        member.active = self.active;
        member
    }
}

/// 单人产出为 rate 的人员列表
pub fn crew_with_rate(rate: f64) -> Vec<WorkforceMember> {
    vec![WorkforceBuilder::new("E001").rate(rate).build()]
}

/// 同一产品族的 n 个订单（交期依次递增）
pub fn same_family_orders(family: &str, n: usize) -> Vec<Order> {
    (0..n)
        .map(|i| {
            OrderBuilder::new(&format!("ORD{:03}", i + 1))
                .family(family)
                .due_in_days(3 + i as i64)
                .build()
        })
        .collect()
}
