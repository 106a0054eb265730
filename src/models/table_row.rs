use serde::Deserialize;

use crate::models::Username;

/// 结果表中一行的原始内容
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    /// 行标识（`data-row-key`）
    pub key: Option<String>,
    /// 每个 `td` 去空白后的文本
    #[serde(default)]
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(key: &str, cells: &[&str]) -> Self {
        Self {
            key: Some(key.to_string()),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// 单行的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// 可邀请的普通创作者
    Verified,
    /// 其余一律拒绝
    Blocked,
}

/// 判定"可用"所需的两个标记文本
#[derive(Debug, Clone)]
pub struct StatusMarkers {
    pub available_status: String,
    pub regular_type: String,
}

impl StatusMarkers {
    /// 状态在第 2 列，类型在第 3 列
    pub fn classify(&self, status: &str, invite_type: &str) -> RowOutcome {
        if status.trim() == self.available_status && invite_type.trim() == self.regular_type {
            RowOutcome::Verified
        } else {
            RowOutcome::Blocked
        }
    }
}

/// 一次结果表分析的输出，按行出现顺序，不去重
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedResults {
    pub verified: Vec<Username>,
    pub blocked: Vec<Username>,
}

impl ExtractedResults {
    pub fn push(&mut self, username: Username, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Verified => self.verified.push(username),
            RowOutcome::Blocked => self.blocked.push(username),
        }
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.verified.contains(username) || self.blocked.contains(username)
    }
}
