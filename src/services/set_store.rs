//! 名单文件服务 - 业务能力层
//!
//! 只负责"读 / 追加 / 压缩"按行存储的用户名文件，不关心流程。
//! 路径未配置或文件不存在时，读取结果为空集合，不算错误。

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::Username;

/// 读取名单为集合
pub fn load_as_set(path: Option<&Path>) -> AppResult<HashSet<Username>> {
    Ok(read_usernames(path)?.into_iter().collect())
}

/// 读取名单，保留首次出现的顺序并去重
pub fn load_ordered_unique(path: Option<&Path>) -> AppResult<Vec<Username>> {
    Ok(first_occurrences(read_usernames(path)?))
}

/// 追加用户名，每行一个
///
/// 空列表直接返回，文件不会被创建或改动。
pub fn append(path: &Path, usernames: &[Username]) -> AppResult<()> {
    if usernames.is_empty() {
        return Ok(());
    }

    debug!("追加 {} 个用户到 {}", usernames.len(), path.display());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::file(path.display().to_string(), e))?;

    let mut body = String::new();
    for username in usernames {
        body.push_str(username.as_str());
        body.push('\n');
    }

    let mut writer = BufWriter::new(file);
    writer
        .write_all(body.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::file(path.display().to_string(), e))?;

    Ok(())
}

/// 去除重复行并整体覆盖写回
///
/// 返回写回的唯一条目数；路径未配置或文件不存在时返回 `None`。
pub fn deduplicate(path: Option<&Path>) -> AppResult<Option<usize>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    info!("🧹 正在去除重复项: {}", path.display());

    let unique = first_occurrences(read_usernames(Some(path))?);

    let mut body = String::new();
    for username in &unique {
        body.push_str(username.as_str());
        body.push('\n');
    }
    fs::write(path, body).map_err(|e| AppError::file(path.display().to_string(), e))?;

    info!("✅ 文件已整理，唯一条目: {}", unique.len());
    Ok(Some(unique.len()))
}

/// 逐行读取并规范化，跳过空行；不存在视为空
fn read_usernames(path: Option<&Path>) -> AppResult<Vec<Username>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::file(path.display().to_string(), e)),
    };

    Ok(content.lines().filter_map(Username::parse).collect())
}

fn first_occurrences(usernames: Vec<Username>) -> Vec<Username> {
    let mut seen = HashSet::new();
    usernames
        .into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect()
}
