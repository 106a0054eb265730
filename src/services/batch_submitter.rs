//! 批次提交服务 - 业务能力层
//!
//! 只负责"让输入框恰好是这一批用户名，然后点下一步"。
//!
//! React 一类的前端会吞掉单一的清空方式，所以清空按顺序尝试：
//! 全选删除 → 直接清空 → 脚本强制清空并派发 input 事件，
//! 每一步后回读确认。写入后再回读一次，不一致时强制清空重写一次。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{Automation, Locator};
use crate::models::Username;

/// 清空输入框并通知前端状态变化
const FORCE_CLEAR_SCRIPT: &str = r#"function (t) {
    t.value = '';
    t.dispatchEvent(new Event('input', { bubbles: true }));
}"#;

/// 批次提交的时序参数
#[derive(Debug, Clone, Copy)]
pub struct SubmitTiming {
    pub wait_timeout: Duration,
    pub ui_settle: Duration,
    pub page_transition: Duration,
}

/// 批次提交
pub struct BatchSubmitter {
    textarea: Locator,
    next_button: Locator,
    timing: SubmitTiming,
}

impl BatchSubmitter {
    pub fn new(textarea: Locator, next_button: Locator, timing: SubmitTiming) -> Self {
        Self {
            textarea,
            next_button,
            timing,
        }
    }

    /// 填入本批并点击下一步
    pub async fn submit(&self, automation: &dyn Automation, batch: &[Username]) -> AppResult<()> {
        automation
            .wait_for_present(&self.textarea, self.timing.wait_timeout)
            .await?;
        self.fill(automation, batch).await?;

        info!("➡️ 点击下一步...");
        automation
            .wait_and_click(&self.next_button, self.timing.wait_timeout)
            .await?;
        sleep(self.timing.page_transition).await;

        Ok(())
    }

    /// 让输入框恰好包含本批用户名
    pub async fn fill(&self, automation: &dyn Automation, batch: &[Username]) -> AppResult<()> {
        let expected = batch_text(batch);

        // 聚焦
        automation
            .wait_and_click(&self.textarea, self.timing.wait_timeout)
            .await?;
        sleep(self.timing.ui_settle).await;

        self.clear_surface(automation).await?;

        automation.type_text(&self.textarea, &expected).await?;
        sleep(self.timing.ui_settle).await;

        let written = automation.read_value(&self.textarea).await?;
        if same_lines(&written, &expected) {
            debug!("输入框已写入 {} 个用户", batch.len());
            return Ok(());
        }

        warn!("⚠️ 输入框内容与本批不一致，强制清空后重写");
        automation.run_script(&self.textarea, FORCE_CLEAR_SCRIPT).await?;
        sleep(self.timing.ui_settle).await;
        automation.clear(&self.textarea).await?;
        automation.type_text(&self.textarea, &expected).await?;
        sleep(self.timing.ui_settle).await;

        let written = automation.read_value(&self.textarea).await?;
        if same_lines(&written, &expected) {
            Ok(())
        } else {
            Err(AppError::InputMismatch {
                expected: batch.len(),
                actual: written,
            })
        }
    }

    /// 依次尝试各种清空方式，直到回读为空
    async fn clear_surface(&self, automation: &dyn Automation) -> AppResult<()> {
        automation.select_all_and_delete(&self.textarea).await?;
        sleep(self.timing.ui_settle).await;
        if is_blank(&automation.read_value(&self.textarea).await?) {
            return Ok(());
        }

        debug!("全选删除无效，改用直接清空");
        automation.clear(&self.textarea).await?;
        sleep(self.timing.ui_settle).await;
        if is_blank(&automation.read_value(&self.textarea).await?) {
            return Ok(());
        }

        debug!("直接清空无效，改用脚本强制清空");
        automation.run_script(&self.textarea, FORCE_CLEAR_SCRIPT).await?;
        sleep(self.timing.ui_settle).await;
        let remaining = automation.read_value(&self.textarea).await?;
        if is_blank(&remaining) {
            Ok(())
        } else {
            Err(AppError::InputNotCleared { remaining })
        }
    }
}

/// 每行一个用户名
pub fn batch_text(batch: &[Username]) -> String {
    batch
        .iter()
        .map(Username::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 按行比较，忽略换行风格和行首尾空白
fn same_lines(actual: &str, expected: &str) -> bool {
    let lines = |s: &str| -> Vec<String> {
        s.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    };
    lines(actual) == lines(expected)
}
