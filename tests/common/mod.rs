//! 模拟邀请页面：记住输入框内容，点下一步后按规则生成结果表

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use creator_invite_bot::models::RawRow;
use creator_invite_bot::{AppResult, Automation, Locator};

#[derive(Default)]
struct PageState {
    textarea: String,
    submitted: Vec<String>,
    on_results: bool,
    captcha_probes_left: usize,
    clicks: Vec<String>,
    row_limit: Option<usize>,
}

/// 模拟页面
///
/// `statuses` 给出每个用户名在结果表中的 (状态, 类型)；不在表里的用户不会出现在结果中。
pub struct FakeInvitePage {
    statuses: HashMap<String, (String, String)>,
    state: Mutex<PageState>,
}

impl FakeInvitePage {
    pub fn new(statuses: &[(&str, &str, &str)]) -> Self {
        Self {
            statuses: statuses
                .iter()
                .map(|(u, s, t)| (u.to_string(), (s.to_string(), t.to_string())))
                .collect(),
            state: Mutex::new(PageState::default()),
        }
    }

    /// 下一次点"下一步"后出现验证码，持续 `probes` 次探测
    pub fn with_captcha(self, probes: usize) -> Self {
        self.state.lock().unwrap().captcha_probes_left = probes;
        self
    }

    /// 结果表只渲染前 `limit` 行（模拟分页）
    pub fn with_row_limit(self, limit: usize) -> Self {
        self.state.lock().unwrap().row_limit = Some(limit);
        self
    }

    pub fn submitted(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }
}

#[async_trait]
impl Automation for FakeInvitePage {
    async fn navigate(&self, _url: &str) -> AppResult<()> {
        Ok(())
    }

    async fn is_present(&self, locator: &Locator) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        Ok(match locator.name.as_str() {
            "验证码" => {
                if state.on_results && state.captcha_probes_left > 0 {
                    state.captcha_probes_left -= 1;
                    true
                } else {
                    false
                }
            }
            "结果页" => state.on_results,
            _ => true,
        })
    }

    async fn try_click(&self, locator: &Locator) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.clicks.push(locator.name.clone());
        match locator.name.as_str() {
            "下一步按钮" => {
                let text = state.textarea.clone();
                state.submitted.push(text);
                state.on_results = true;
            }
            "Anterior" => state.on_results = false,
            _ => {}
        }
        Ok(true)
    }

    async fn read_value(&self, _locator: &Locator) -> AppResult<String> {
        Ok(self.state.lock().unwrap().textarea.clone())
    }

    async fn select_all_and_delete(&self, _locator: &Locator) -> AppResult<()> {
        // 与受控组件一样忽略这种清空
        Ok(())
    }

    async fn clear(&self, _locator: &Locator) -> AppResult<()> {
        self.state.lock().unwrap().textarea.clear();
        Ok(())
    }

    async fn type_text(&self, _locator: &Locator, text: &str) -> AppResult<()> {
        self.state.lock().unwrap().textarea.push_str(text);
        Ok(())
    }

    async fn run_script(&self, _locator: &Locator, _function_declaration: &str) -> AppResult<()> {
        self.state.lock().unwrap().textarea.clear();
        Ok(())
    }

    async fn collect_rows(&self, _rows: &Locator, _key_attribute: &str) -> AppResult<Vec<RawRow>> {
        let state = self.state.lock().unwrap();
        let last = state.submitted.last().cloned().unwrap_or_default();
        Ok(last
            .lines()
            .take(state.row_limit.unwrap_or(usize::MAX))
            .filter_map(|user| {
                self.statuses.get(user).map(|(status, kind)| RawRow {
                    key: Some(user.to_string()),
                    cells: vec![String::new(), status.clone(), kind.clone()],
                })
            })
            .collect())
    }
}
