//! 批次处理上下文
//!
//! 封装"我正在处理第几批、这批是谁"这一信息

use std::fmt::Display;

use crate::models::Username;

/// 批次处理上下文
#[derive(Debug, Clone)]
pub struct BatchCtx {
    /// 批次编号（从1开始，仅用于日志显示）
    pub batch_index: usize,

    /// 本批用户名
    pub usernames: Vec<Username>,

    /// 取批时剩余的可处理人数
    pub remaining: usize,
}

impl BatchCtx {
    /// 创建新的批次上下文
    pub fn new(batch_index: usize, usernames: Vec<Username>, remaining: usize) -> Self {
        Self {
            batch_index,
            usernames,
            remaining,
        }
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[批次 #{} 人数 {} / 剩余 {}]",
            self.batch_index,
            self.usernames.len(),
            self.remaining
        )
    }
}
