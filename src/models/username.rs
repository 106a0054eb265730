use std::fmt::Display;

/// 用户名前缀标记（"@handle"）
pub const HANDLE_MARKER: char = '@';

/// 规范化后的用户名
///
/// 去掉首尾空白和开头的 `@`，且不为空。只能通过 [`Username::parse`] 构造，
/// 所以磁盘上和内存里都不会出现带标记的用户名。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// 解析一行原始文本，空行返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 规范化原始用户名：去空白，去掉开头所有 `@`，再去空白
pub fn normalize(raw: &str) -> String {
    raw.trim().trim_start_matches(HANDLE_MARKER).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_marker_and_whitespace() {
        assert_eq!(normalize("@maria"), "maria");
        assert_eq!(normalize("  @maria \r\n"), "maria");
        assert_eq!(normalize("@ maria"), "maria");
        assert_eq!(normalize("maria"), "maria");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["@@joao", " @ @x ", "ana.silva", "@", "", "\t@b_c\t"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "输入: {:?}", raw);
        }
    }

    #[test]
    fn test_marker_inside_handle_is_kept() {
        assert_eq!(normalize("@foo@bar"), "foo@bar");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(Username::parse("").is_none());
        assert!(Username::parse("   ").is_none());
        assert!(Username::parse(" @ ").is_none());
    }

    #[test]
    fn test_parse_equality_after_normalization() {
        assert_eq!(Username::parse("@pedro"), Username::parse("pedro "));
        assert_eq!(Username::parse("@pedro").unwrap().as_str(), "pedro");
    }
}
