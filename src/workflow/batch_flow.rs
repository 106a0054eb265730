//! 批次处理流程 - 流程层
//!
//! 核心职责：定义"一批用户"从提交到落盘的每个阶段
//!
//! 阶段顺序：
//! 1. 提交（填输入框 → 下一步）
//! 2. 验证码（如有，等人工解决）
//! 3. 等待结果页
//! 4. 分析结果表 → 追加到名单 → 返回上一步

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::browser::Selectors;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Automation, Locator, OperatorSignal};
use crate::models::{StatusMarkers, Username};
use crate::services::{set_store, BatchSubmitter, ChallengeGate, ResultExtractor, SubmitTiming};
use crate::workflow::batch_ctx::BatchCtx;

/// 单批的处理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub verified: usize,
    pub blocked: usize,
    /// 提交了但结果表里没有的用户，不写入任何名单
    pub unlisted: Vec<Username>,
}

/// 批次处理流程
///
/// - 持有各项业务能力和两个输出文件路径
/// - 不持有页面资源，由调用方传入 `Automation`
pub struct BatchFlow {
    submitter: BatchSubmitter,
    gate: ChallengeGate,
    extractor: ResultExtractor,
    selection_screen: Locator,
    previous_button: Locator,
    verified_file: PathBuf,
    blacklist_file: PathBuf,
    wait_timeout: Duration,
    page_transition: Duration,
}

impl BatchFlow {
    /// 创建新的批次流程
    pub fn new(config: &Config, selectors: &Selectors) -> AppResult<Self> {
        let verified_file = config
            .verified_file
            .clone()
            .ok_or_else(|| AppError::Config("VERIFIED_FILE 未设置".to_string()))?;
        let blacklist_file = config
            .blacklist_file
            .clone()
            .ok_or_else(|| AppError::Config("BLACKLIST_FILE 未设置".to_string()))?;

        let timing = SubmitTiming {
            wait_timeout: config.wait_timeout,
            ui_settle: config.ui_settle,
            page_transition: config.page_transition,
        };

        Ok(Self {
            submitter: BatchSubmitter::new(selectors.textarea.clone(), selectors.next_button.clone(), timing),
            gate: ChallengeGate::new(selectors.captcha.clone(), config.challenge_poll_interval),
            extractor: ResultExtractor::new(
                selectors.result_rows.clone(),
                StatusMarkers {
                    available_status: config.available_status.clone(),
                    regular_type: config.regular_type.clone(),
                },
            ),
            selection_screen: selectors.selection_screen.clone(),
            previous_button: selectors.previous_button.clone(),
            verified_file,
            blacklist_file,
            wait_timeout: config.wait_timeout,
            page_transition: config.page_transition,
        })
    }

    /// 阶段 1：提交本批
    pub async fn submit(&self, automation: &dyn Automation, ctx: &BatchCtx) -> AppResult<()> {
        info!("{} 🚀 提交本批用户", ctx);
        self.submitter.submit(automation, &ctx.usernames).await
    }

    /// 阶段 2：如有验证码，等待人工解决
    pub async fn clear_challenge(
        &self,
        automation: &dyn Automation,
        signal: &mut dyn OperatorSignal,
        ctx: &BatchCtx,
    ) -> AppResult<bool> {
        let handled = self.gate.await_resolution_if_present(automation, signal).await?;
        if handled {
            info!("{} 验证码处理完毕，继续", ctx);
        }
        Ok(handled)
    }

    /// 阶段 3：等待结果页出现，超时即失败
    pub async fn await_results(&self, automation: &dyn Automation, ctx: &BatchCtx) -> AppResult<()> {
        info!("{} ⏳ 等待校验结果...", ctx);
        automation
            .wait_for_present(&self.selection_screen, self.wait_timeout)
            .await
    }

    /// 阶段 4：分析结果、追加名单并返回提交页
    pub async fn persist(&self, automation: &dyn Automation, ctx: &BatchCtx) -> AppResult<BatchOutcome> {
        let results = self.extractor.analyze_table(automation).await?;

        let unlisted: Vec<Username> = ctx
            .usernames
            .iter()
            .filter(|u| !results.contains(u))
            .cloned()
            .collect();
        if !unlisted.is_empty() {
            warn!(
                "{} ⚠️ {} 个用户未出现在结果表中，本次运行不再提交: {:?}",
                ctx,
                unlisted.len(),
                unlisted.iter().map(Username::as_str).collect::<Vec<_>>()
            );
        }

        set_store::append(&self.verified_file, &results.verified)?;
        set_store::append(&self.blacklist_file, &results.blocked)?;

        info!("{} ✅ 本批结果已保存", ctx);

        automation
            .wait_and_click(&self.previous_button, self.wait_timeout)
            .await?;
        sleep(self.page_transition).await;

        Ok(BatchOutcome {
            verified: results.verified.len(),
            blocked: results.blocked.len(),
            unlisted,
        })
    }
}
