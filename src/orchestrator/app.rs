//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、写运行日志表头、打开浏览器、创建 PageDriver
//! 2. **资源管理**：唯一持有 Browser 的模块，保证 page 在整个运行期间有效
//! 3. **委托**：把页面能力和终端信号交给 `InviteLoop`

use chromiumoxide::Browser;
use tracing::info;

use crate::browser;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{stdin_signal, PageDriver};
use crate::orchestrator::invite_loop::{InviteLoop, RunSummary};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    driver: PageDriver,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let config = config.validate()?;

        logging::init_log_file(&config.run_log_file)?;

        let source = config
            .users_source_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(未设置)".to_string());
        logging::log_startup(config.batch_size, &source);

        let (browser, page) = browser::open_browser(&config).await?;

        // 创建 PageDriver（持有 page）
        let driver = PageDriver::new(page);

        Ok(Self {
            config,
            _browser: browser,
            driver,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let mut signal = stdin_signal();
        let summary = InviteLoop::new(&self.config, &self.driver, &mut signal)?
            .run()
            .await?;

        info!("🏁 处理成功结束");
        Ok(summary)
    }
}
