pub mod connection;
pub mod launch;
pub mod selectors;

use chromiumoxide::{Browser, Page};

use crate::config::Config;
use crate::error::AppResult;

pub use connection::connect_to_browser_and_page;
pub use launch::launch_browser;
pub use selectors::Selectors;

/// 按配置打开浏览器：设置了调试端口就连接，否则自行启动
pub async fn open_browser(config: &Config) -> AppResult<(Browser, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port, connection::host_of(&config.start_url)).await,
        None => launch_browser(config).await,
    }
}
