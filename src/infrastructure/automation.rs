//! 自动化边界 - 基础设施层
//!
//! 核心流程只依赖这里列出的能力，不认识具体的浏览器驱动。
//! 可能阻塞在远端页面状态上的操作都返回 `AppResult`，超时为 `AppError::Timeout`。

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::error::{AppError, AppResult};
use crate::models::RawRow;

/// 有界等待中两次探测之间的间隔
pub const POLL_STEP: Duration = Duration::from_millis(250);

/// 页面元素定位
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    /// 日志里显示的名字
    pub name: String,
    /// XPath 表达式
    pub xpath: String,
}

impl Locator {
    pub fn xpath(name: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xpath: xpath.into(),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 浏览器自动化能力
///
/// 职责：
/// - 只暴露"找元素 / 点 / 读 / 写 / 跑脚本"的原语
/// - 不认识用户名、批次、名单文件
#[async_trait]
pub trait Automation: Send + Sync {
    /// 打开起始页面
    async fn navigate(&self, url: &str) -> AppResult<()>;

    /// 非阻塞探测元素是否存在，找不到返回 `false`
    async fn is_present(&self, locator: &Locator) -> AppResult<bool>;

    /// 元素存在且可点击时点击，返回是否点到
    async fn try_click(&self, locator: &Locator) -> AppResult<bool>;

    /// 读取输入框的 value（非输入元素读文本）
    async fn read_value(&self, locator: &Locator) -> AppResult<String>;

    /// 全选后删除
    async fn select_all_and_delete(&self, locator: &Locator) -> AppResult<()>;

    /// 直接清空
    async fn clear(&self, locator: &Locator) -> AppResult<()>;

    /// 在元素中键入文本（追加在光标处）
    async fn type_text(&self, locator: &Locator, text: &str) -> AppResult<()>;

    /// 以元素为参数执行脚本，`function_declaration` 形如 `function (el) { ... }`
    async fn run_script(&self, locator: &Locator, function_declaration: &str) -> AppResult<()>;

    /// 枚举匹配的行，返回行标识属性和每个 `td` 的文本
    async fn collect_rows(&self, rows: &Locator, key_attribute: &str) -> AppResult<Vec<RawRow>>;

    /// 有界等待元素出现
    async fn wait_for_present(&self, locator: &Locator, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_present(locator).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::timeout(locator.to_string(), timeout));
            }
            sleep(POLL_STEP).await;
        }
    }

    /// 有界等待元素可点击并点击
    async fn wait_and_click(&self, locator: &Locator, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.try_click(locator).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AppError::timeout(locator.to_string(), timeout));
            }
            sleep(POLL_STEP).await;
        }
    }
}
