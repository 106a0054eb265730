//! 邀请主循环 - 编排层
//!
//! ## 状态机
//!
//! ```text
//! AwaitingStart → Idle → SubmittingBatch → AwaitingChallengeClear
//!                  ↑                                ↓
//!                  └──── Persisting ← AwaitingResults
//! Idle（无候选）→ Done
//! ```
//!
//! - 每次回到 `Idle` 都重新读取三个名单文件，不缓存
//! - 唯一的退出条件是 `Idle` 时没有可处理的用户
//! - 任何错误直接返回，`Done` 的去重不会执行，已追加的结果保留
//! - 结果表里缺失的用户只在本次运行内跳过，不写入名单，下次运行仍会提交

use std::collections::HashSet;
use std::fmt::Display;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::Selectors;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Automation, OperatorSignal};
use crate::models::Username;
use crate::services::{candidate_resolver, set_store};
use crate::utils::logging;
use crate::workflow::{BatchCtx, BatchFlow, BatchOutcome};

/// 主循环状态
#[derive(Debug, Clone)]
pub enum LoopState {
    AwaitingStart,
    Idle,
    SubmittingBatch(BatchCtx),
    AwaitingChallengeClear(BatchCtx),
    AwaitingResults(BatchCtx),
    Persisting(BatchCtx),
    Done,
}

impl Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopState::AwaitingStart => "AwaitingStart",
            LoopState::Idle => "Idle",
            LoopState::SubmittingBatch(_) => "SubmittingBatch",
            LoopState::AwaitingChallengeClear(_) => "AwaitingChallengeClear",
            LoopState::AwaitingResults(_) => "AwaitingResults",
            LoopState::Persisting(_) => "Persisting",
            LoopState::Done => "Done",
        };
        f.write_str(name)
    }
}

/// 整次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub verified: usize,
    pub blocked: usize,
    pub unlisted: usize,
    pub challenges: usize,
    /// 去重后已验证名单的条目数
    pub verified_unique: Option<usize>,
    /// 去重后黑名单的条目数
    pub blacklist_unique: Option<usize>,
}

/// 邀请主循环
///
/// 不持有浏览器，只借用自动化能力和操作员信号，方便替换成测试替身。
pub struct InviteLoop<'a> {
    config: &'a Config,
    selectors: Selectors,
    flow: BatchFlow,
    automation: &'a dyn Automation,
    signal: &'a mut dyn OperatorSignal,
    summary: RunSummary,
    /// 本次运行中未出现在结果表里的用户
    deferred: HashSet<Username>,
}

impl<'a> InviteLoop<'a> {
    pub fn new(
        config: &'a Config,
        automation: &'a dyn Automation,
        signal: &'a mut dyn OperatorSignal,
    ) -> AppResult<Self> {
        let selectors = Selectors::from_config(config);
        let flow = BatchFlow::new(config, &selectors)?;
        Ok(Self {
            config,
            selectors,
            flow,
            automation,
            signal,
            summary: RunSummary::default(),
            deferred: HashSet::new(),
        })
    }

    /// 从 `AwaitingStart` 跑到 `Done`
    pub async fn run(mut self) -> AppResult<RunSummary> {
        let mut state = LoopState::AwaitingStart;

        loop {
            debug!("状态: {}", state);
            state = match state {
                LoopState::AwaitingStart => {
                    self.start().await?;
                    LoopState::Idle
                }
                LoopState::Idle => self.next_batch()?,
                LoopState::SubmittingBatch(ctx) => {
                    self.flow.submit(self.automation, &ctx).await?;
                    LoopState::AwaitingChallengeClear(ctx)
                }
                LoopState::AwaitingChallengeClear(ctx) => {
                    if self
                        .flow
                        .clear_challenge(self.automation, &mut *self.signal, &ctx)
                        .await?
                    {
                        self.summary.challenges += 1;
                    }
                    LoopState::AwaitingResults(ctx)
                }
                LoopState::AwaitingResults(ctx) => {
                    self.flow.await_results(self.automation, &ctx).await?;
                    LoopState::Persisting(ctx)
                }
                LoopState::Persisting(ctx) => {
                    let outcome = self.flow.persist(self.automation, &ctx).await?;
                    self.record_batch(&ctx, &outcome)?;
                    LoopState::Idle
                }
                LoopState::Done => {
                    self.finish()?;
                    return Ok(self.summary);
                }
            };
        }
    }

    /// 打开起始页，等操作员确认后进入邀请页面
    async fn start(&mut self) -> AppResult<()> {
        let timeout = self.config.wait_timeout;

        self.automation.navigate(&self.config.start_url).await?;

        info!("⌨️ 登录并打开页面后，在终端按 Enter 开始");
        self.signal.wait_for_continue().await?;

        self.automation
            .wait_and_click(&self.selectors.recruit_creators, timeout)
            .await?;
        sleep(self.config.page_transition).await;

        self.automation
            .wait_and_click(&self.selectors.invite_creators, timeout)
            .await?;
        sleep(self.config.page_transition).await;

        Ok(())
    }

    /// 重新读取名单并取下一批；没有候选时进入 `Done`
    fn next_batch(&mut self) -> AppResult<LoopState> {
        let source_pool = set_store::load_ordered_unique(self.config.users_source_file.as_deref())?;
        let blacklist = set_store::load_as_set(self.config.blacklist_file.as_deref())?;
        let verified = set_store::load_as_set(self.config.verified_file.as_deref())?;

        let mut eligible = candidate_resolver::resolve_eligible(&source_pool, &blacklist, &verified);
        eligible.retain(|u| !self.deferred.contains(u));
        if eligible.is_empty() {
            info!("📊 没有剩余可处理的用户");
            if !self.deferred.is_empty() {
                warn!("⚠️ {} 个用户未出现在结果表中，留待下次运行", self.deferred.len());
            }
            return Ok(LoopState::Done);
        }

        let batch = candidate_resolver::take_batch(&eligible, self.config.batch_size);
        let ctx = BatchCtx::new(self.summary.batches + 1, batch, eligible.len());
        logging::log_batch_start(ctx.batch_index, ctx.usernames.len(), ctx.remaining);

        Ok(LoopState::SubmittingBatch(ctx))
    }

    fn record_batch(&mut self, ctx: &BatchCtx, outcome: &BatchOutcome) -> AppResult<()> {
        self.summary.batches += 1;
        self.summary.verified += outcome.verified;
        self.summary.blocked += outcome.blocked;
        self.summary.unlisted += outcome.unlisted.len();
        self.deferred.extend(outcome.unlisted.iter().cloned());

        logging::log_batch_complete(ctx.batch_index, outcome.verified, outcome.blocked);
        logging::append_log_line(
            &self.config.run_log_file,
            &format!(
                "第 {} 批: 提交 {}, 验证 {}, 拒绝 {}, 未列出 {}",
                ctx.batch_index,
                ctx.usernames.len(),
                outcome.verified,
                outcome.blocked,
                outcome.unlisted.len()
            ),
        )
    }

    /// 两个输出文件各去重一次
    fn finish(&mut self) -> AppResult<()> {
        info!("\n🧹 正在清理最终的重复项...");
        self.summary.blacklist_unique = set_store::deduplicate(self.config.blacklist_file.as_deref())?;
        self.summary.verified_unique = set_store::deduplicate(self.config.verified_file.as_deref())?;

        print_final_stats(&self.summary, &self.config.run_log_file);
        logging::append_log_line(
            &self.config.run_log_file,
            &format!(
                "完成: {} 批, 验证 {}, 拒绝 {}, 未列出 {}, 验证码 {}",
                self.summary.batches,
                self.summary.verified,
                self.summary.blocked,
                self.summary.unlisted,
                self.summary.challenges
            ),
        )
    }
}

fn print_final_stats(summary: &RunSummary, log_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("🏁 处理完成");
    info!("完成时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("📦 批次: {}", summary.batches);
    info!("✅ 验证: {}", summary.verified);
    info!("🚫 拒绝: {}", summary.blocked);
    info!("❔ 未列出: {}", summary.unlisted);
    info!("🛑 验证码: {}", summary.challenges);
    if let Some(n) = summary.verified_unique {
        info!("已验证名单唯一条目: {}", n);
    }
    if let Some(n) = summary.blacklist_unique {
        info!("黑名单唯一条目: {}", n);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file);
}
