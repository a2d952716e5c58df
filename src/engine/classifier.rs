// ==========================================
// 层压排产引擎 - 订单分类引擎
// ==========================================
// 职责: 按产品族分组订单 + 计算分组紧急度
// 输入: 订单列表
// 输出: 产品族分组（最紧急的分组在前）
// ==========================================

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, instrument};

use crate::domain::order::{Order, ProductFamilyGroup};

// ==========================================
// OrderClassifier - 订单分类引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct OrderClassifier {
    urgent_window_days: i64,
    default_priority: f64,
}

impl OrderClassifier {
    /// 构造函数
    ///
    /// # 参数
    /// - `urgent_window_days`: 紧急窗口（天）
    /// - `default_priority`: 缺失优先级时的默认分数
    pub fn new(urgent_window_days: i64, default_priority: f64) -> Self {
        Self {
            urgent_window_days,
            default_priority,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按产品族分组并排序
    ///
    /// 规则:
    /// 1) 缺失产品族 → unknown 分组（兜底，不是错误）
    /// 2) 组内按 due_date 升序，同交期按 priority_score 升序
    /// 3) urgent_count = due_date ≤ today + 紧急窗口 的订单数
    /// 4) average_priority = 优先级分数均值（缺失按默认值）
    /// 5) 分组按 urgent_count 降序，再按 average_priority 升序
    ///
    /// 同值时保持首次出现顺序，保证结果可复现。
    #[instrument(skip_all, fields(order_count = orders.len(), today = %today))]
    pub fn classify<'a>(&self, orders: &'a [Order], today: NaiveDate) -> Vec<ProductFamilyGroup<'a>> {
        // 1. 分桶（保持首次出现顺序）
        let mut index_by_family: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<(String, Vec<&'a Order>)> = Vec::new();

        for order in orders {
            let key = order.group_key();
            match index_by_family.get(&key) {
                Some(&idx) => buckets[idx].1.push(order),
                None => {
                    index_by_family.insert(key.clone(), buckets.len());
                    buckets.push((key, vec![order]));
                }
            }
        }

        // 2. 组内排序 + 统计
        let urgent_threshold = urgent_threshold(today, self.urgent_window_days);
        let default_priority = self.default_priority;

        let mut groups: Vec<ProductFamilyGroup<'a>> = buckets
            .into_iter()
            .map(|(family, mut members)| {
                members.sort_by(|a, b| {
                    a.due_date.cmp(&b.due_date).then_with(|| {
                        a.priority_or(default_priority)
                            .total_cmp(&b.priority_or(default_priority))
                    })
                });

                let urgent_count = members
                    .iter()
                    .filter(|o| o.due_date <= urgent_threshold)
                    .count();
                let priority_sum: f64 = members
                    .iter()
                    .map(|o| o.priority_or(default_priority))
                    .sum();
                let average_priority = priority_sum / members.len() as f64;

                ProductFamilyGroup {
                    family,
                    orders: members,
                    urgent_count,
                    average_priority,
                }
            })
            .collect();

        // 3. 分组排序：紧急数多者优先，再按平均优先级
        groups.sort_by(|a, b| {
            b.urgent_count
                .cmp(&a.urgent_count)
                .then_with(|| a.average_priority.total_cmp(&b.average_priority))
        });

        debug!(group_count = groups.len(), "订单分类完成");
        groups
    }
}

/// 紧急截止日 = today + 窗口；溢出时取日期边界
fn urgent_threshold(today: NaiveDate, window_days: i64) -> NaiveDate {
    if window_days >= 0 {
        today
            .checked_add_days(Days::new(window_days as u64))
            .unwrap_or(NaiveDate::MAX)
    } else {
        today
            .checked_sub_days(Days::new(window_days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for OrderClassifier {
    fn default() -> Self {
        Self::new(7, 1.0)
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
    }

    fn order(id: &str, family: Option<&str>, due_in_days: i64, priority: Option<f64>) -> Order {
        Order {
            order_id: id.to_string(),
            family: family.map(str::to_string),
            due_date: today() + Duration::days(due_in_days),
            priority_score: priority,
            customer: "TEST".to_string(),
            order_date: today() - Duration::days(30),
            quantity: None,
            features: None,
        }
    }

    #[test]
    fn test_empty_orders() {
        let classifier = OrderClassifier::default();
        assert!(classifier.classify(&[], today()).is_empty());
    }

    #[test]
    fn test_orders_within_group_sorted_by_due_then_priority() {
        let classifier = OrderClassifier::default();
        let orders = vec![
            order("A3", Some("fam"), 10, Some(5.0)),
            order("A2", Some("fam"), 3, Some(9.0)),
            order("A1", Some("fam"), 3, Some(2.0)),
        ];

        let groups = classifier.classify(&orders, today());
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_urgent_count_and_average_priority() {
        let classifier = OrderClassifier::default();
        let orders = vec![
            order("A1", Some("fam"), 7, Some(2.0)), // 边界: 正好 7 天，计为紧急
            order("A2", Some("fam"), 8, None),      // 缺失优先级按 1
            order("A3", Some("fam"), -1, Some(3.0)), // 超期
        ];

        let groups = classifier.classify(&orders, today());
        assert_eq!(groups[0].urgent_count, 2);
        assert!((groups[0].average_priority - 2.0).abs() < 1e-9);
        assert_eq!(groups[0].total_orders(), 3);
    }

    #[test]
    fn test_extreme_urgent_window_saturates() {
        let orders = vec![
            order("A1", Some("fam"), 400, None),
            order("A2", Some("fam"), -400, None),
        ];

        let wide = OrderClassifier::new(i64::MAX, 1.0).classify(&orders, today());
        assert_eq!(wide[0].urgent_count, 2);

        let negative = OrderClassifier::new(i64::MIN, 1.0).classify(&orders, today());
        assert_eq!(negative[0].urgent_count, 0);
    }

    #[test]
    fn test_missing_family_goes_to_unknown_bucket() {
        let classifier = OrderClassifier::default();
        let orders = vec![
            order("A1", None, 20, None),
            order("A2", Some(""), 20, None),
            order("A3", Some("fam"), 20, None),
        ];

        let groups = classifier.classify(&orders, today());
        let unknown = groups.iter().find(|g| g.family == "unknown").unwrap();
        assert_eq!(unknown.total_orders(), 2);
    }

    #[test]
    fn test_groups_sorted_by_urgency_then_priority() {
        let classifier = OrderClassifier::default();
        let orders = vec![
            order("R1", Some("relaxed"), 30, Some(1.0)),
            order("U1", Some("urgent"), 2, Some(50.0)),
            order("H1", Some("high_pri"), 30, Some(0.5)),
        ];

        let groups = classifier.classify(&orders, today());
        let families: Vec<&str> = groups.iter().map(|g| g.family.as_str()).collect();
        assert_eq!(families, vec!["urgent", "high_pri", "relaxed"]);
    }
}
