// ==========================================
// 层压排产引擎 - API层错误类型
// ==========================================
// 职责: 定义边界层错误类型（输入加载、校验、导出）
// 说明: 引擎层不抛错，错误只出现在 API 边界
// ==========================================

use thiserror::Error;

use crate::config::ConfigError;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 输入快照校验失败（带逐条违规详情）
    #[error("输入校验失败: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(#[from] ConfigError),

    // ==========================================
    // I/O 与序列化错误
    // ==========================================
    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 导出失败: {0}")]
    Csv(#[from] csv::Error),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 校验违规详情
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// 字段路径（例如 orders[3].order_id）
    pub field: String,
    /// 违规原因
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ApiError {
    /// 由违规列表构造校验错误（空列表返回 None）
    pub fn from_violations(violations: Vec<ValidationViolation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        let reason = format!(
            "{} 处违规，首条: {}: {}",
            violations.len(),
            violations[0].field,
            violations[0].message
        );
        Some(ApiError::ValidationError { reason, violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_violations() {
        assert!(ApiError::from_violations(Vec::new()).is_none());

        let err = ApiError::from_violations(vec![
            ValidationViolation::new("orders[0].order_id", "订单ID为空"),
            ValidationViolation::new("orders[2].order_id", "订单ID重复: A1"),
        ])
        .unwrap();

        match &err {
            ApiError::ValidationError { violations, reason } => {
                assert_eq!(violations.len(), 2);
                assert!(reason.contains("orders[0].order_id"));
            }
            _ => panic!("Expected ValidationError"),
        }
        assert!(err.to_string().contains("输入校验失败"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let api_err: ApiError = json_err.into();
        assert!(matches!(api_err, ApiError::Json(_)));
    }
}
