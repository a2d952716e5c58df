// ==========================================
// 层压排产引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、配置快照
// 存储: JSON 文件（缺省键取默认值）
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::scheduler_config::{
    SchedulerConfig, MAX_HORIZON_WORKDAYS, MAX_URGENT_WINDOW_DAYS,
};
use crate::domain::types::WorkdayPattern;

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: path={path}, error={source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置项无效: key={key}, value={value}, reason={reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: SchedulerConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有配置
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.to_path_buf());

        info!(path = %path.display(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = serde_json::from_str(raw)?;
        validate(&config)?;
        Ok(Self::with_config(config))
    }

    /// 应用进程环境变量覆写
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 应用覆写（lookup 返回 None 表示未设置）
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(config_keys::HORIZON_WORKDAYS) {
            self.config.horizon_workdays =
                parse_value(config_keys::HORIZON_WORKDAYS, &value)?;
        }

        if let Some(value) = lookup(config_keys::WORKDAYS) {
            self.config.workdays =
                WorkdayPattern::parse_iso_list(&value).map_err(|reason| {
                    ConfigError::InvalidValue {
                        key: config_keys::WORKDAYS.to_string(),
                        value: value.clone(),
                        reason,
                    }
                })?;
        }

        if let Some(value) = lookup(config_keys::URGENT_WINDOW_DAYS) {
            self.config.urgent_window_days =
                parse_value(config_keys::URGENT_WINDOW_DAYS, &value)?;
        }

        validate(&self.config)?;

        debug!(
            horizon_workdays = self.config.horizon_workdays,
            workdays = %self.config.workdays,
            urgent_window_days = self.config.urgent_window_days,
            "配置覆写完成"
        );
        Ok(self)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn into_config(self) -> SchedulerConfig {
        self.config
    }

    /// 配置来源文件（若从文件加载）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 获取配置快照（JSON格式）
    ///
    /// # 用途
    /// - 随排产结果一同返回，保证结果可复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }

    /// 从配置快照恢复
    pub fn restore_from_snapshot(snapshot_json: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(snapshot_json)
    }
}

/// 校验取值范围（文件加载与覆写后都会调用）
///
/// - horizon_workdays ≤ MAX_HORIZON_WORKDAYS
/// - urgent_window_days ∈ 0..=MAX_URGENT_WINDOW_DAYS
/// - default_priority 与两个阈值必须是有限数
fn validate(config: &SchedulerConfig) -> Result<(), ConfigError> {
    let invalid = |key: &str, value: String, reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        reason,
    };

    if config.horizon_workdays > MAX_HORIZON_WORKDAYS {
        return Err(invalid(
            "horizon_workdays",
            config.horizon_workdays.to_string(),
            format!("必须不大于 {}", MAX_HORIZON_WORKDAYS),
        ));
    }
    if !(0..=MAX_URGENT_WINDOW_DAYS).contains(&config.urgent_window_days) {
        return Err(invalid(
            "urgent_window_days",
            config.urgent_window_days.to_string(),
            format!("必须在 0..={} 之间", MAX_URGENT_WINDOW_DAYS),
        ));
    }

    let numbers = [
        ("default_priority", config.default_priority),
        ("efficiency_threshold_pct", config.efficiency_threshold_pct),
        ("underutilized_threshold_pct", config.underutilized_threshold_pct),
    ];
    if let Some((key, value)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(invalid(*key, value.to_string(), "必须是有限数".to_string()));
    }
    Ok(())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

// ==========================================
// 环境变量键
// ==========================================
pub mod config_keys {
    // 排产窗口
    pub const HORIZON_WORKDAYS: &str = "LAYUP_SCHEDULER_HORIZON_WORKDAYS";
    pub const WORKDAYS: &str = "LAYUP_SCHEDULER_WORKDAYS"; // 例如 "1,2,3,4"

    // 紧急窗口
    pub const URGENT_WINDOW_DAYS: &str = "LAYUP_SCHEDULER_URGENT_WINDOW_DAYS";
}
