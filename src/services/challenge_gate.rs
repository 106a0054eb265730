//! 验证码关卡 - 业务能力层
//!
//! 只负责"发现验证码并等人解决"，不关心流程。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::infrastructure::{Automation, Locator, OperatorSignal};

/// 验证码关卡
pub struct ChallengeGate {
    marker: Locator,
    poll_interval: Duration,
}

impl ChallengeGate {
    pub fn new(marker: Locator, poll_interval: Duration) -> Self {
        Self {
            marker,
            poll_interval,
        }
    }

    /// 非阻塞探测，找不到标记即为 `false`
    ///
    /// 探测失败（如导航中页面上下文被销毁）也按"不存在"处理。
    pub async fn is_challenge_present(&self, automation: &dyn Automation) -> bool {
        match automation.is_present(&self.marker).await {
            Ok(present) => present,
            Err(e) => {
                debug!("验证码探测失败，按不存在处理: {}", e);
                false
            }
        }
    }

    /// 有验证码时等待操作员信号，再轮询到验证码消失
    ///
    /// 没有超时。返回是否处理过验证码。
    pub async fn await_resolution_if_present(
        &self,
        automation: &dyn Automation,
        signal: &mut dyn OperatorSignal,
    ) -> AppResult<bool> {
        if !self.is_challenge_present(automation).await {
            return Ok(false);
        }

        warn!("🛑 检测到验证码，请在浏览器中完成后按 Enter 继续");
        signal.wait_for_continue().await?;

        while self.is_challenge_present(automation).await {
            sleep(self.poll_interval).await;
        }

        info!("✅ 验证码已解决");
        Ok(true)
    }
}
