/// 日志工具模块
///
/// 控制台日志用 tracing，运行摘要另写一份纯文本日志文件
use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// 初始化控制台日志，默认 info 级别，可用 `RUST_LOG` 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 测试里可能被多次调用，已初始化时保持原订阅者
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// 初始化运行日志文件（覆盖旧内容，写入带时间的表头）
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n邀请批处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file(log_file_path, e))?;
    Ok(())
}

/// 向运行日志追加一行，自动加时间前缀
pub fn append_log_line(log_file_path: &str, line: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file(log_file_path, e))?;

    writeln!(file, "[{}] {}", chrono::Local::now().format("%H:%M:%S"), line)
        .map_err(|e| AppError::file(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(batch_size: usize, source: &str) {
    info!("{}", "=".repeat(60));
    info!("🔄 邀请机器人启动");
    info!("📋 候选名单: {}", source);
    info!("📦 每批人数: {}", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, batch_len: usize, remaining: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 剩余可处理: {}", remaining);
    info!("🚀 开始处理第 {} 批，共 {} 个用户", batch_num, batch_len);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, verified: usize, blocked: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 验证 {} / 拒绝 {}", batch_num, verified, blocked);
    info!("{}", "─".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_header_then_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();
        append_log_line(path, "第 1 批: 验证 2, 拒绝 1").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("邀请批处理日志"));
        assert!(content.trim_end().ends_with("第 1 批: 验证 2, 拒绝 1"));
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init();
        init();
        info!("日志初始化两次后仍可输出");
    }
}
