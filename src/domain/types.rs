// ==========================================
// 层压排产引擎 - 领域类型定义
// ==========================================
// 职责: 产品族标识规范化、模具兼容性、工作日模式、紧急等级、订单类型与材料类别
// 红线: 兼容性是"标签化变体",不是列表中的魔法字符串
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 缺失产品族的订单统一归入的保留分组
pub const UNKNOWN_FAMILY: &str = "unknown";

/// 外部数据中表示"通用模具"的保留标记（仅在边界转换时识别）
pub const UNIVERSAL_MARKER: &str = "universal";

// ==========================================
// 产品族标识规范化
// ==========================================

/// 规范化产品族标识：小写，去除 `_` 与 `-`
///
/// 用于吸收命名差异，例如 "stock_model_x" 与 "StockModelX" 视为同一产品族。
/// 分类器的 unknown 判定与兼容性解析共用此函数。
pub fn normalize_family(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 计算订单所属分组键
///
/// - None / 空白 → UNKNOWN_FAMILY
/// - 规范化后等于 unknown → UNKNOWN_FAMILY
/// - 其他 → 原始标识（逐字保留）
pub fn family_group_key(family: Option<&str>) -> String {
    match family.map(str::trim) {
        Some(id) if !id.is_empty() && normalize_family(id) != UNKNOWN_FAMILY => id.to_string(),
        _ => UNKNOWN_FAMILY.to_string(),
    }
}

// ==========================================
// 模具兼容性 (Compatibility)
// ==========================================
// 外部表示: 可选的产品族列表
//   - 缺失 / 空列表 / 含 "universal"（逐字，区分大小写）→ Universal
//   - 其他 → Restricted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum Compatibility {
    /// 通用模具，接受任意产品族
    Universal,
    /// 仅接受列出的产品族
    Restricted(Vec<String>),
}

impl Compatibility {
    /// 从外部产品族列表构造
    pub fn from_families<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let families: Vec<String> = families.into_iter().map(Into::into).collect();
        if families.is_empty() || families.iter().any(|f| f == UNIVERSAL_MARKER) {
            Compatibility::Universal
        } else {
            Compatibility::Restricted(families)
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Compatibility::Universal)
    }

    /// 判断是否接受指定产品族
    ///
    /// 顺序（命中即返回）:
    /// 1) Universal → 接受
    /// 2) 列表中逐字匹配 → 接受
    /// 3) 规范化后匹配 → 接受
    ///
    /// 空产品族的拒绝由 CompatibilityResolver 负责（在通用判定之前）。
    pub fn accepts(&self, family: &str) -> bool {
        match self {
            Compatibility::Universal => true,
            Compatibility::Restricted(families) => {
                if families.iter().any(|f| f == family) {
                    return true;
                }
                let normalized = normalize_family(family);
                families.iter().any(|f| normalize_family(f) == normalized)
            }
        }
    }
}

impl Default for Compatibility {
    fn default() -> Self {
        Compatibility::Universal
    }
}

impl From<Option<Vec<String>>> for Compatibility {
    fn from(families: Option<Vec<String>>) -> Self {
        match families {
            Some(list) => Compatibility::from_families(list),
            None => Compatibility::Universal,
        }
    }
}

impl From<Compatibility> for Option<Vec<String>> {
    fn from(compat: Compatibility) -> Self {
        match compat {
            Compatibility::Universal => None,
            Compatibility::Restricted(families) => Some(families),
        }
    }
}

// ==========================================
// 工作日模式 (Workday Pattern)
// ==========================================
// 序列化格式: ISO 星期序号列表 (1=周一 ... 7=周日)
// 默认: 周一至周四
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct WorkdayPattern {
    // 按周一起始顺序排列，去重
    days: Vec<Weekday>,
}

impl WorkdayPattern {
    /// 从星期列表构造（自动排序去重）
    pub fn new<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Self { days }
    }

    /// 周一至周四（标准配置）
    pub fn monday_to_thursday() -> Self {
        Self::new([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu])
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// 一周内第一个允许的工作日
    pub fn first(&self) -> Option<Weekday> {
        self.days.first().copied()
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// 解析逗号分隔的 ISO 星期序号，例如 "1,2,3,4"
    pub fn parse_iso_list(raw: &str) -> Result<Self, String> {
        let numbers = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().map_err(|e| format!("无效星期序号 {}: {}", s, e)))
            .collect::<Result<Vec<u32>, String>>()?;
        Self::try_from(numbers)
    }
}

impl Default for WorkdayPattern {
    fn default() -> Self {
        Self::monday_to_thursday()
    }
}

impl TryFrom<Vec<u32>> for WorkdayPattern {
    type Error = String;

    fn try_from(numbers: Vec<u32>) -> Result<Self, Self::Error> {
        let days = numbers
            .into_iter()
            .map(|n| match n {
                1 => Ok(Weekday::Mon),
                2 => Ok(Weekday::Tue),
                3 => Ok(Weekday::Wed),
                4 => Ok(Weekday::Thu),
                5 => Ok(Weekday::Fri),
                6 => Ok(Weekday::Sat),
                7 => Ok(Weekday::Sun),
                other => Err(format!("星期序号超出范围 (1-7): {}", other)),
            })
            .collect::<Result<Vec<Weekday>, String>>()?;
        Ok(Self::new(days))
    }
}

impl From<WorkdayPattern> for Vec<u32> {
    fn from(pattern: WorkdayPattern) -> Self {
        pattern
            .days
            .iter()
            .map(|d| d.number_from_monday())
            .collect()
    }
}

impl fmt::Display for WorkdayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.days.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}

// ==========================================
// 紧急等级 (Urgency Level)
// ==========================================
// 由交期距离推导，供优先级评分使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Critical, // 超期或 2 天内
    High,     // 5 天内
    Medium,   // 10 天内
    Low,      // 其他 / 无交期
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::Critical => write!(f, "CRITICAL"),
            UrgencyLevel::High => write!(f, "HIGH"),
            UrgencyLevel::Medium => write!(f, "MEDIUM"),
            UrgencyLevel::Low => write!(f, "LOW"),
        }
    }
}

// ==========================================
// 订单类型 (Order Type)
// ==========================================
// 产品族缺失或为占位值的订单信息不全，排在队尾

/// 表示"信息不全"的产品族占位值（忽略大小写）
const PLACEHOLDER_FAMILIES: [&str; 3] = ["none", "unprocessed", UNIVERSAL_MARKER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    ProductionOrder,  // 可排产订单
    NeedsInformation, // 缺少产品族信息
}

impl OrderType {
    /// 由订单产品族判定类型
    pub fn from_family(family: Option<&str>) -> Self {
        match family.map(str::trim) {
            Some(id)
                if !id.is_empty()
                    && !PLACEHOLDER_FAMILIES
                        .iter()
                        .any(|p| id.eq_ignore_ascii_case(p)) =>
            {
                OrderType::ProductionOrder
            }
            _ => OrderType::NeedsInformation,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::ProductionOrder => write!(f, "PRODUCTION_ORDER"),
            OrderType::NeedsInformation => write!(f, "NEEDS_INFORMATION"),
        }
    }
}

// ==========================================
// 材料类别 (Material)
// ==========================================
// 由产品族前缀判定: cf_ → 碳纤维, fg_ → 玻纤, 其他 → unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Cf,
    Fg,
    Unknown,
}

impl MaterialType {
    pub fn from_family(family: Option<&str>) -> Self {
        let id = family.unwrap_or_default().to_ascii_lowercase();
        if id.starts_with("cf_") {
            MaterialType::Cf
        } else if id.starts_with("fg_") {
            MaterialType::Fg
        } else {
            MaterialType::Unknown
        }
    }
}
