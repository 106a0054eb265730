use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// 目标表单单次提交的人数上限（"Insira até 30 criadores"）
pub const MAX_BATCH_SIZE: usize = 30;

/// 默认配置文件名
const DEFAULT_CONFIG_FILE: &str = "invite.toml";

/// 程序配置
///
/// 启动时构建一次，之后以引用传给各组件，不存在全局配置。
#[derive(Clone, Debug)]
pub struct Config {
    /// Chrome 用户数据目录（保留登录状态）
    pub chrome_profile_path: Option<PathBuf>,
    /// Chrome 可执行文件路径，未设置时由 chromiumoxide 自动探测
    pub chrome_executable: Option<PathBuf>,
    /// 已运行浏览器的调试端口，设置后改为连接模式
    pub browser_debug_port: Option<u16>,
    /// 起始URL
    pub start_url: String,
    /// 候选用户名单
    pub users_source_file: Option<PathBuf>,
    /// 黑名单（被拒绝的用户）
    pub blacklist_file: Option<PathBuf>,
    /// 已验证名单
    pub verified_file: Option<PathBuf>,
    /// 每批提交人数
    pub batch_size: usize,
    /// 单次等待元素的预算
    pub wait_timeout: Duration,
    /// 验证码轮询间隔
    pub challenge_poll_interval: Duration,
    /// 输入框操作之间的短暂停顿
    pub ui_settle: Duration,
    /// 页面切换后的等待
    pub page_transition: Duration,
    /// 表格中"可用"状态文本
    pub available_status: String,
    /// 表格中"普通邀请"类型文本
    pub regular_type: String,
    /// 验证码提示文本
    pub captcha_text: String,
    /// 运行日志文件
    pub run_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_profile_path: None,
            chrome_executable: None,
            browser_debug_port: None,
            start_url: String::new(),
            users_source_file: None,
            blacklist_file: None,
            verified_file: None,
            batch_size: MAX_BATCH_SIZE,
            wait_timeout: Duration::from_secs(30),
            challenge_poll_interval: Duration::from_secs(1),
            ui_settle: Duration::from_millis(1000),
            page_transition: Duration::from_millis(3000),
            available_status: "Disponível".to_string(),
            regular_type: "Regular".to_string(),
            captcha_text: "Seleciona 2 objetos com a mesma forma".to_string(),
            run_log_file: "invite_run.log".to_string(),
        }
    }
}

/// TOML 配置文件的形状，所有字段可选，缺省沿用默认值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    chrome_profile_path: Option<PathBuf>,
    chrome_executable: Option<PathBuf>,
    browser_debug_port: Option<u16>,
    start_url: Option<String>,
    users_source_file: Option<PathBuf>,
    blacklist_file: Option<PathBuf>,
    verified_file: Option<PathBuf>,
    batch_size: Option<usize>,
    wait_timeout_secs: Option<u64>,
    challenge_poll_ms: Option<u64>,
    ui_settle_ms: Option<u64>,
    page_transition_ms: Option<u64>,
    available_status: Option<String>,
    regular_type: Option<String>,
    captcha_text: Option<String>,
    run_log_file: Option<String>,
}

impl Config {
    /// 按 默认值 → TOML 文件 → 环境变量（含 .env）的顺序构建配置
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        let file_path = std::env::var("INVITE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if Path::new(&file_path).exists() {
            debug!("读取配置文件: {}", file_path);
            config = config.merge_toml_file(Path::new(&file_path))?;
        }

        Ok(config.merge_env())
    }

    /// 读取 TOML 配置文件并覆盖已有字段
    pub fn merge_toml_file(self, path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::file(path.display().to_string(), e))?;
        self.merge_toml_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// 解析 TOML 文本并覆盖已有字段
    pub fn merge_toml_str(self, content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        Ok(Self {
            chrome_profile_path: file.chrome_profile_path.or(self.chrome_profile_path),
            chrome_executable: file.chrome_executable.or(self.chrome_executable),
            browser_debug_port: file.browser_debug_port.or(self.browser_debug_port),
            start_url: file.start_url.unwrap_or(self.start_url),
            users_source_file: file.users_source_file.or(self.users_source_file),
            blacklist_file: file.blacklist_file.or(self.blacklist_file),
            verified_file: file.verified_file.or(self.verified_file),
            batch_size: file.batch_size.unwrap_or(self.batch_size),
            wait_timeout: file.wait_timeout_secs.map(Duration::from_secs).unwrap_or(self.wait_timeout),
            challenge_poll_interval: file
                .challenge_poll_ms
                .map(Duration::from_millis)
                .unwrap_or(self.challenge_poll_interval),
            ui_settle: file.ui_settle_ms.map(Duration::from_millis).unwrap_or(self.ui_settle),
            page_transition: file
                .page_transition_ms
                .map(Duration::from_millis)
                .unwrap_or(self.page_transition),
            available_status: file.available_status.unwrap_or(self.available_status),
            regular_type: file.regular_type.unwrap_or(self.regular_type),
            captcha_text: file.captcha_text.unwrap_or(self.captcha_text),
            run_log_file: file.run_log_file.unwrap_or(self.run_log_file),
        })
    }

    /// 用环境变量覆盖已有字段
    pub fn merge_env(self) -> Self {
        let path_var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let parse_var = |name: &str| std::env::var(name).ok().and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            chrome_profile_path: path_var("CHROME_PROFILE_PATH").or(self.chrome_profile_path),
            chrome_executable: path_var("CHROME_EXECUTABLE").or(self.chrome_executable),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(self.browser_debug_port),
            start_url: std::env::var("START_URL").unwrap_or(self.start_url),
            users_source_file: path_var("USERS_SOURCE_FILE").or(self.users_source_file),
            blacklist_file: path_var("BLACKLIST_FILE").or(self.blacklist_file),
            verified_file: path_var("VERIFIED_FILE")
                .or_else(|| path_var("VERIFICATED_FILE"))
                .or(self.verified_file),
            batch_size: std::env::var("BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.batch_size),
            wait_timeout: parse_var("WAIT_TIMEOUT_SECS").map(Duration::from_secs).unwrap_or(self.wait_timeout),
            challenge_poll_interval: parse_var("CHALLENGE_POLL_MS")
                .map(Duration::from_millis)
                .unwrap_or(self.challenge_poll_interval),
            ui_settle: parse_var("UI_SETTLE_MS").map(Duration::from_millis).unwrap_or(self.ui_settle),
            page_transition: parse_var("PAGE_TRANSITION_MS")
                .map(Duration::from_millis)
                .unwrap_or(self.page_transition),
            available_status: std::env::var("AVAILABLE_STATUS").unwrap_or(self.available_status),
            regular_type: std::env::var("REGULAR_TYPE").unwrap_or(self.regular_type),
            captcha_text: std::env::var("CAPTCHA_TEXT").unwrap_or(self.captcha_text),
            run_log_file: std::env::var("RUN_LOG_FILE").unwrap_or(self.run_log_file),
        }
    }

    /// 检查运行所需的配置，并把批次大小限制在 1..=30
    ///
    /// 名单文件缺失只对"读取"意味着空集合；结果写不进去时循环永远不会收敛，
    /// 所以两个输出文件必须配置。
    pub fn validate(mut self) -> AppResult<Self> {
        if self.start_url.trim().is_empty() {
            return Err(AppError::Config("START_URL 未设置".to_string()));
        }
        if self.blacklist_file.is_none() {
            return Err(AppError::Config("BLACKLIST_FILE 未设置".to_string()));
        }
        if self.verified_file.is_none() {
            return Err(AppError::Config("VERIFIED_FILE 未设置".to_string()));
        }
        if self.users_source_file.is_none() {
            warn!("⚠️ USERS_SOURCE_FILE 未设置，候选名单视为空");
        }

        let clamped = self.batch_size.clamp(1, MAX_BATCH_SIZE);
        if clamped != self.batch_size {
            warn!("⚠️ 批次大小 {} 超出范围，已调整为 {}", self.batch_size, clamped);
            self.batch_size = clamped;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runnable() -> Config {
        Config {
            start_url: "https://example.com/creators".to_string(),
            blacklist_file: Some(PathBuf::from("blacklist.txt")),
            verified_file: Some(PathBuf::from("verified.txt")),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_match_form_limits() {
        let config = Config::default();
        assert_eq!(config.batch_size, 30);
        assert_eq!(config.wait_timeout, Duration::from_secs(30));
        assert_eq!(config.challenge_poll_interval, Duration::from_secs(1));
        assert_eq!(config.available_status, "Disponível");
        assert_eq!(config.regular_type, "Regular");
    }

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let config = Config::default()
            .merge_toml_str(
                r#"
                start_url = "https://example.com/start"
                blacklist_file = "data/blacklist.txt"
                batch_size = 10
                ui_settle_ms = 250
                "#,
            )
            .unwrap();

        assert_eq!(config.start_url, "https://example.com/start");
        assert_eq!(config.blacklist_file, Some(PathBuf::from("data/blacklist.txt")));
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.ui_settle, Duration::from_millis(250));
        assert_eq!(config.page_transition, Duration::from_millis(3000));
        assert!(config.verified_file.is_none());
    }

    #[test]
    fn test_toml_rejects_wrong_types() {
        assert!(Config::default().merge_toml_str("batch_size = \"many\"").is_err());
    }

    #[test]
    fn test_validate_requires_output_files() {
        let mut config = runnable();
        config.verified_file = None;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = runnable();
        config.start_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_clamps_batch_size() {
        let mut config = runnable();
        config.batch_size = 500;
        assert_eq!(config.validate().unwrap().batch_size, MAX_BATCH_SIZE);

        let mut config = runnable();
        config.batch_size = 0;
        assert_eq!(config.validate().unwrap().batch_size, 1);
    }
}
