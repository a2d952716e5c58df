// ==========================================
// 层压排产引擎 - 优先级评分引擎
// ==========================================
// 职责: 由交期推导紧急等级与优先级分数（分数越小越紧急）
// 输入: 订单 + 基准日期
// 输出: (OrderType, UrgencyLevel, priority_score, reason)
// ==========================================

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::domain::order::Order;
use crate::domain::types::{OrderType, UrgencyLevel};

/// 评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityAssessment {
    pub order_type: OrderType,
    pub level: UrgencyLevel,
    pub score: f64,
    pub reason: String,
}

// ==========================================
// PriorityScorer - 优先级评分引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    production_order_base: f64,
    needs_information_base: f64,
    due_date_weight: f64,
}

impl PriorityScorer {
    /// 构造函数
    ///
    /// # 参数
    /// - `production_order_base`: 可排产订单基础分
    /// - `needs_information_base`: 信息不全订单基础分（排在队尾）
    /// - `due_date_weight`: 距交期天数的权重
    pub fn new(production_order_base: f64, needs_information_base: f64, due_date_weight: f64) -> Self {
        Self {
            production_order_base,
            needs_information_base,
            due_date_weight,
        }
    }

    /// 订单类型对应的基础分
    pub fn base_score(&self, order_type: OrderType) -> f64 {
        match order_type {
            OrderType::ProductionOrder => self.production_order_base,
            OrderType::NeedsInformation => self.needs_information_base,
        }
    }

    // ==========================================
    // 紧急等级判定
    // ==========================================

    /// 判定紧急等级
    ///
    /// 规则（命中即返回）:
    /// 1) 超期 或 距交期 ≤ 2 天 → CRITICAL
    /// 2) ≤ 5 天 → HIGH
    /// 3) ≤ 10 天 → MEDIUM
    /// 4) 其他 → LOW
    pub fn urgency_level(&self, due_date: NaiveDate, today: NaiveDate) -> UrgencyLevel {
        match (due_date - today).num_days() {
            d if d <= 2 => UrgencyLevel::Critical,
            d if d <= 5 => UrgencyLevel::High,
            d if d <= 10 => UrgencyLevel::Medium,
            _ => UrgencyLevel::Low,
        }
    }

    /// 紧急等级加成（负数 = 更紧急）
    pub fn urgency_bonus(level: UrgencyLevel) -> f64 {
        match level {
            UrgencyLevel::Critical => -10.0,
            UrgencyLevel::High => -5.0,
            UrgencyLevel::Medium => 0.0,
            UrgencyLevel::Low => 5.0,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单个订单的优先级
    ///
    /// score = base(订单类型) + urgency_bonus + days_until_due × weight
    pub fn assess(&self, order: &Order, today: NaiveDate) -> PriorityAssessment {
        let order_type = OrderType::from_family(order.family.as_deref());
        let days_until_due = (order.due_date - today).num_days();
        let level = self.urgency_level(order.due_date, today);
        let score = self.base_score(order_type)
            + Self::urgency_bonus(level)
            + days_until_due as f64 * self.due_date_weight;

        PriorityAssessment {
            order_type,
            level,
            score,
            reason: format!(
                "PRIORITY_{}: type={}, days_until_due={}",
                level, order_type, days_until_due
            ),
        }
    }

    /// 为缺失优先级分数的订单补齐分数（已有分数保持不变）
    ///
    /// # 返回
    /// 补齐后的订单副本（顺序与输入一致）
    #[instrument(skip_all, fields(order_count = orders.len(), today = %today))]
    pub fn fill_missing(&self, orders: &[Order], today: NaiveDate) -> Vec<Order> {
        let mut derived = 0usize;
        let filled = orders
            .iter()
            .map(|order| {
                let mut order = order.clone();
                if order.priority_score.is_none() {
                    order.priority_score = Some(self.assess(&order, today).score);
                    derived += 1;
                }
                order
            })
            .collect();

        debug!(derived, "缺失优先级已补齐");
        filled
    }
}

impl Default for PriorityScorer {
    fn default() -> Self {
        Self::new(50.0, 99.0, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
    }

    fn order(id: &str, due_in_days: i64, priority: Option<f64>) -> Order {
        Order {
            order_id: id.to_string(),
            family: Some("cf_fam".to_string()),
            due_date: today() + Duration::days(due_in_days),
            priority_score: priority,
            customer: "TEST".to_string(),
            order_date: today(),
            quantity: None,
            features: None,
        }
    }

    #[test]
    fn test_urgency_levels() {
        let scorer = PriorityScorer::default();
        let level = |days| scorer.urgency_level(today() + Duration::days(days), today());
        assert_eq!(level(-3), UrgencyLevel::Critical);
        assert_eq!(level(2), UrgencyLevel::Critical);
        assert_eq!(level(3), UrgencyLevel::High);
        assert_eq!(level(5), UrgencyLevel::High);
        assert_eq!(level(10), UrgencyLevel::Medium);
        assert_eq!(level(11), UrgencyLevel::Low);
    }

    #[test]
    fn test_score_formula() {
        let scorer = PriorityScorer::default();
        // HIGH: 50 - 5 + 4 × 0.1
        let assessment = scorer.assess(&order("A1", 4, None), today());
        assert_eq!(assessment.level, UrgencyLevel::High);
        assert!((assessment.score - 45.4).abs() < 1e-9);

        // LOW: 50 + 5 + 20 × 0.1
        let assessment = scorer.assess(&order("A2", 20, None), today());
        assert!((assessment.score - 57.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_missing_keeps_existing_scores() {
        let scorer = PriorityScorer::default();
        let orders = vec![order("A1", 1, Some(3.0)), order("A2", 1, None)];
        let filled = scorer.fill_missing(&orders, today());

        assert_eq!(filled[0].priority_score, Some(3.0));
        // CRITICAL: 50 - 10 + 0.1
        assert!((filled[1].priority_score.unwrap() - 40.1).abs() < 1e-9);
    }

    #[test]
    fn test_needs_information_base() {
        let scorer = PriorityScorer::default();
        let mut pending = order("A1", 4, None);
        pending.family = Some("unprocessed".to_string());

        // HIGH: 99 - 5 + 4 × 0.1
        let assessment = scorer.assess(&pending, today());
        assert_eq!(assessment.order_type, OrderType::NeedsInformation);
        assert!((assessment.score - 94.4).abs() < 1e-9);
        assert!(assessment.reason.contains("NEEDS_INFORMATION"));

        pending.family = None;
        assert_eq!(scorer.assess(&pending, today()).order_type, OrderType::NeedsInformation);

        let ready = scorer.assess(&order("A2", 4, None), today());
        assert_eq!(ready.order_type, OrderType::ProductionOrder);
        assert!(ready.score < assessment.score);
    }
}
