// ==========================================
// 层压排产引擎 - 命令行入口
// ==========================================
// 用法:
//   layup-scheduler <input.json> [--config <file>] [--start YYYY-MM-DD] [--csv <file>] [--log-json]
//
// 输入快照: {"orders": [...], "resource_pools": [...], "workforce": [...]}
// 输出: 排产响应 JSON（stdout）；日志写 stderr
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use layup_scheduler::api::ScheduleApi;
use layup_scheduler::config::ConfigManager;
use layup_scheduler::engine::TracingEventPublisher;
use layup_scheduler::logging;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "layup-scheduler", version, about = "层压排产引擎 - 订单到模具/工作日的产能分配")]
struct CliArgs {
    /// 输入快照（JSON）
    input: PathBuf,

    /// 配置文件（JSON，缺省键取默认值）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 起始日期（YYYY-MM-DD），缺省为本地当天
    #[arg(long = "start", value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// 分配结果 CSV 导出路径
    #[arg(long)]
    csv: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    log_json: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("起始日期格式错误: {} ({})", value, e))
}

fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("层压排产引擎 v{}", layup_scheduler::VERSION);

    // 1. 配置：文件（可选）+ 环境变量覆写
    let config_manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => ConfigManager::new(),
    }
    .with_env_overrides()
    .context("环境变量覆写失败")?;

    // 2. 输入快照
    let input = ScheduleApi::load_input(&cli.input)
        .with_context(|| format!("加载输入失败: {}", cli.input.display()))?;

    // 3. 运行
    let api = ScheduleApi::new(
        Arc::new(config_manager),
        Some(Arc::new(TracingEventPublisher)),
    );
    let response = api.run_schedule(&input, cli.start_date)?;

    // 4. 输出
    if let Some(csv_path) = &cli.csv {
        ScheduleApi::export_allocations_csv_file(&response.allocations, csv_path)
            .with_context(|| format!("CSV 导出失败: {}", csv_path.display()))?;
    }

    let json = serde_json::to_string_pretty(&response).context("序列化排产结果失败")?;
    println!("{}", json);
    Ok(())
}
