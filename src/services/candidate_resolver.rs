//! 候选解析服务 - 业务能力层
//!
//! 纯函数：每轮都用最新的文件内容重新计算，不做缓存。

use std::collections::HashSet;

use crate::config::MAX_BATCH_SIZE;
use crate::models::Username;

/// 从候选池中排除黑名单和已验证名单，保留原有顺序
pub fn resolve_eligible(
    source_pool: &[Username],
    blacklist: &HashSet<Username>,
    verified: &HashSet<Username>,
) -> Vec<Username> {
    source_pool
        .iter()
        .filter(|u| !blacklist.contains(*u) && !verified.contains(*u))
        .cloned()
        .collect()
}

/// 取出队首的一批，长度为 `min(N, batch_size)`
///
/// `batch_size` 被限制在 `1..=MAX_BATCH_SIZE`，表单一次最多接受 30 个。
pub fn take_batch(eligible: &[Username], batch_size: usize) -> Vec<Username> {
    eligible
        .iter()
        .take(batch_size.clamp(1, MAX_BATCH_SIZE))
        .cloned()
        .collect()
}
