//! 单元测试用的脚本化自动化替身

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::infrastructure::automation::{Automation, Locator};
use crate::models::RawRow;

#[derive(Default)]
struct MockState {
    /// 按定位名记录的存在性序列，剩最后一个值时不再弹出
    presence: HashMap<String, VecDeque<bool>>,
    /// 探测时直接报错的定位名
    failing: HashSet<String>,
    value: String,
    ignore_select_all: bool,
    ignore_clear: bool,
    ignore_script: bool,
    rows: Vec<RawRow>,
    actions: Vec<String>,
}

/// 记录所有调用的假页面，输入框内容保存在内存里
#[derive(Default)]
pub struct ScriptedAutomation {
    state: Mutex<MockState>,
}

impl ScriptedAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_presence(&self, name: &str, sequence: &[bool]) {
        self.state
            .lock()
            .unwrap()
            .presence
            .insert(name.to_string(), sequence.iter().copied().collect());
    }

    pub fn fail_presence(&self, name: &str) {
        self.state.lock().unwrap().failing.insert(name.to_string());
    }

    pub fn set_value(&self, value: &str) {
        self.state.lock().unwrap().value = value.to_string();
    }

    pub fn value(&self) -> String {
        self.state.lock().unwrap().value.clone()
    }

    /// 模拟忽略全选删除 / 直接清空的前端
    pub fn ignore_naive_clears(&self) {
        let mut state = self.state.lock().unwrap();
        state.ignore_select_all = true;
        state.ignore_clear = true;
    }

    pub fn ignore_scripts(&self) {
        self.state.lock().unwrap().ignore_script = true;
    }

    pub fn set_rows(&self, rows: Vec<RawRow>) {
        self.state.lock().unwrap().rows = rows;
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    fn probe(&self, locator: &Locator) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.presence.get_mut(&locator.name) {
            Some(seq) if seq.len() > 1 => seq.pop_front().unwrap_or(true),
            Some(seq) => seq.front().copied().unwrap_or(true),
            None => true,
        }
    }

    fn record(&self, action: String) {
        self.state.lock().unwrap().actions.push(action);
    }
}

#[async_trait]
impl Automation for ScriptedAutomation {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        self.record(format!("navigate {}", url));
        Ok(())
    }

    async fn is_present(&self, locator: &Locator) -> AppResult<bool> {
        if self.state.lock().unwrap().failing.contains(&locator.name) {
            return Err(AppError::script(locator.to_string(), "页面上下文已销毁"));
        }
        Ok(self.probe(locator))
    }

    async fn try_click(&self, locator: &Locator) -> AppResult<bool> {
        let clicked = self.probe(locator);
        if clicked {
            self.record(format!("click {}", locator.name));
        }
        Ok(clicked)
    }

    async fn read_value(&self, locator: &Locator) -> AppResult<String> {
        self.record(format!("read {}", locator.name));
        Ok(self.value())
    }

    async fn select_all_and_delete(&self, locator: &Locator) -> AppResult<()> {
        self.record(format!("select_all_delete {}", locator.name));
        let mut state = self.state.lock().unwrap();
        if !state.ignore_select_all {
            state.value.clear();
        }
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> AppResult<()> {
        self.record(format!("clear {}", locator.name));
        let mut state = self.state.lock().unwrap();
        if !state.ignore_clear {
            state.value.clear();
        }
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> AppResult<()> {
        self.record(format!("type {} {:?}", locator.name, text));
        self.state.lock().unwrap().value.push_str(text);
        Ok(())
    }

    async fn run_script(&self, locator: &Locator, function_declaration: &str) -> AppResult<()> {
        self.record(format!("script {}", locator.name));
        if !self.probe(locator) {
            return Err(AppError::script(locator.to_string(), "元素不存在"));
        }
        let mut state = self.state.lock().unwrap();
        if !state.ignore_script && function_declaration.contains("value = ''") {
            state.value.clear();
        }
        Ok(())
    }

    async fn collect_rows(&self, rows: &Locator, _key_attribute: &str) -> AppResult<Vec<RawRow>> {
        self.record(format!("rows {}", rows.name));
        Ok(self.state.lock().unwrap().rows.clone())
    }
}
