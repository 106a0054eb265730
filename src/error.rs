use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误都是致命的：主循环不做恢复，已追加的进度保留在磁盘上，
/// 下次运行时会被候选解析器自动排除。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器 / CDP 调用失败
    #[error("浏览器错误: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// 在等待预算内没有等到目标元素
    #[error("等待元素超时: {locator} (超时 {timeout:?})")]
    Timeout { locator: String, timeout: Duration },

    /// 页面脚本返回了意料之外的结果
    #[error("执行脚本失败 ({locator}): {message}")]
    Script { locator: String, message: String },

    /// 文件读写失败
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 脚本结果反序列化失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 清空输入框后仍有残留内容
    #[error("输入框未能清空，残留内容: {remaining:?}")]
    InputNotCleared { remaining: String },

    /// 写入后输入框内容与本批不一致
    #[error("输入框内容与本批不一致: 期望 {expected} 行, 实际 {actual:?}")]
    InputMismatch { expected: usize, actual: String },

    /// 操作员信号源已关闭（例如 stdin 已到 EOF）
    #[error("操作员信号通道已关闭")]
    SignalClosed,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建等待超时错误
    pub fn timeout(locator: impl Into<String>, timeout: Duration) -> Self {
        AppError::Timeout {
            locator: locator.into(),
            timeout,
        }
    }

    /// 创建文件错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// 创建脚本错误
    pub fn script(locator: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Script {
            locator: locator.into(),
            message: message.into(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
