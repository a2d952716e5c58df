// ==========================================
// 层压排产引擎 - 工作日日历生成
// ==========================================
// 职责: 生成排产窗口内按时间排序的可排产工作日
// 红线: 所有日期的星期必须属于允许模式
// ==========================================

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, instrument, warn};

use crate::config::MAX_HORIZON_WORKDAYS;

use crate::domain::plan::WorkDay;
use crate::domain::types::WorkdayPattern;

// ==========================================
// CalendarGenerator - 工作日日历生成器
// ==========================================
#[derive(Debug, Clone)]
pub struct CalendarGenerator {
    pattern: WorkdayPattern,
}

impl CalendarGenerator {
    pub fn new(pattern: WorkdayPattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &WorkdayPattern {
        &self.pattern
    }

    /// 生成工作日序列
    ///
    /// 规则:
    /// 1) 从 start 向后推进到模式中第一个允许的星期（标准配置为周一）
    /// 2) 按周展开允许的星期，最后一个允许日之后直接跳到下一周
    /// 3) 收集满 count 个为止（count 上限 MAX_HORIZON_WORKDAYS）
    ///
    /// 模式为空或 count 为 0 时返回空列表；日期越过 NaiveDate::MAX 时提前结束。
    #[instrument(skip(self), fields(pattern = %self.pattern))]
    pub fn generate(&self, start: NaiveDate, count: usize) -> Vec<WorkDay> {
        let Some(first) = self.pattern.first() else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }

        let limit = MAX_HORIZON_WORKDAYS as usize;
        if count > limit {
            warn!(requested = count, limit, "排产窗口超过上限，按上限截断");
        }
        let count = count.min(limit);

        // 1. 对齐到第一个允许的星期
        let offset = (7 + first.num_days_from_monday() as u64
            - start.weekday().num_days_from_monday() as u64)
            % 7;
        let Some(mut week_anchor) = start.checked_add_days(Days::new(offset)) else {
            return Vec::new();
        };

        // 2. 按周展开
        let mut days = Vec::with_capacity(count);
        'weeks: loop {
            for weekday in self.pattern.days() {
                let delta = (weekday.num_days_from_monday() - first.num_days_from_monday()) as u64;
                let Some(date) = week_anchor.checked_add_days(Days::new(delta)) else {
                    break 'weeks;
                };
                days.push(WorkDay::new(date));
                if days.len() == count {
                    break 'weeks;
                }
            }
            match week_anchor.checked_add_days(Days::new(7)) {
                Some(next) => week_anchor = next,
                None => break,
            }
        }

        if let (Some(first_day), Some(last_day)) = (days.first(), days.last()) {
            debug!(
                first = %first_day.date,
                last = %last_day.date,
                count = days.len(),
                "工作日生成完成"
            );
        }
        days
    }
}

impl Default for CalendarGenerator {
    fn default() -> Self {
        Self::new(WorkdayPattern::monday_to_thursday())
    }
}
