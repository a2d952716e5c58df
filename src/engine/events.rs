// ==========================================
// 层压排产引擎 - 排产事件发布
// ==========================================
// 职责: 定义排产事件发布 trait，由调用方注入遥测实现
// 说明: 引擎内不直接输出诊断信息，只发布结构化事件
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 排产事件类型
// ==========================================

/// 排产事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEventType {
    /// 排产运行开始
    RunStarted,
    /// 产品族分组内存在无兼容模具的订单
    GroupWithoutResources,
    /// 订单已分配
    OrderAllocated,
    /// 订单未分配
    OrderUnallocated,
    /// 排产运行结束
    RunCompleted,
}

impl ScheduleEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            ScheduleEventType::RunStarted => "RunStarted",
            ScheduleEventType::GroupWithoutResources => "GroupWithoutResources",
            ScheduleEventType::OrderAllocated => "OrderAllocated",
            ScheduleEventType::OrderUnallocated => "OrderUnallocated",
            ScheduleEventType::RunCompleted => "RunCompleted",
        }
    }
}

/// 排产事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// 排产运行 ID
    pub run_id: String,
    /// 事件类型
    pub event_type: ScheduleEventType,
    /// 关联订单
    pub order_id: Option<String>,
    /// 关联产品族
    pub family: Option<String>,
    /// 关联模具
    pub resource_id: Option<String>,
    /// 关联日期
    pub date: Option<NaiveDate>,
    /// 事件说明
    pub detail: Option<String>,
}

impl ScheduleEvent {
    /// 创建运行级事件
    pub fn run_level(run_id: &str, event_type: ScheduleEventType, detail: String) -> Self {
        Self {
            run_id: run_id.to_string(),
            event_type,
            order_id: None,
            family: None,
            resource_id: None,
            date: None,
            detail: Some(detail),
        }
    }

    /// 创建订单级事件
    pub fn order_level(
        run_id: &str,
        event_type: ScheduleEventType,
        order_id: &str,
        family: &str,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            event_type,
            order_id: Some(order_id.to_string()),
            family: Some(family.to_string()),
            resource_id: None,
            date: None,
            detail: None,
        }
    }

    pub fn with_resource(mut self, resource_id: &str, date: NaiveDate) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self.date = Some(date);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 排产事件发布者 Trait
///
/// 由调用方实现并注入 Allocator。发布失败不会中断排产，只记录告警。
pub trait ScheduleEventPublisher: Send + Sync {
    /// 发布排产事件
    fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ScheduleEventPublisher for NoOpEventPublisher {
    fn publish(&self, _event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// 转发为 tracing 结构化日志的事件发布者
#[derive(Debug, Clone, Default)]
pub struct TracingEventPublisher;

impl ScheduleEventPublisher for TracingEventPublisher {
    fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            target: "layup_scheduler::events",
            run_id = %event.run_id,
            event_type = event.event_type.as_str(),
            order_id = event.order_id.as_deref().unwrap_or(""),
            family = event.family.as_deref().unwrap_or(""),
            resource_id = event.resource_id.as_deref().unwrap_or(""),
            date = ?event.date,
            detail = event.detail.as_deref().unwrap_or(""),
            "schedule event"
        );
        Ok(())
    }
}

/// 内存收集事件发布者（供调用方回放/测试）
#[derive(Debug, Default)]
pub struct CollectingEventPublisher {
    events: Mutex<Vec<ScheduleEvent>>,
}

impl CollectingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收集事件的副本
    pub fn events(&self) -> Vec<ScheduleEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 按类型统计事件数
    pub fn count(&self, event_type: ScheduleEventType) -> usize {
        self.events()
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

impl ScheduleEventPublisher for CollectingEventPublisher {
    fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events
            .lock()
            .map_err(|e| format!("事件缓冲锁获取失败: {}", e))?
            .push(event);
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn ScheduleEventPublisher>> 的使用
#[derive(Clone)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ScheduleEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn ScheduleEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者），失败仅记录告警
    pub fn publish(&self, event: ScheduleEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };

        let event_type = event.event_type;
        if let Err(e) = publisher.publish(event) {
            tracing::warn!(
                event_type = event_type.as_str(),
                error = %e,
                "事件发布失败，继续排产"
            );
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for OptionalEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalEventPublisher")
            .field("configured", &self.is_configured())
            .finish()
    }
}
