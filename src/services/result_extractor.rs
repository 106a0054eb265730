//! 结果表分析服务 - 业务能力层
//!
//! 只负责把结果表拆成"已验证 / 已拒绝"两组，不做去重，不写文件。

use tracing::{debug, info, warn};

use crate::browser::selectors::ROW_KEY_ATTRIBUTE;
use crate::error::AppResult;
use crate::infrastructure::{Automation, Locator};
use crate::models::{ExtractedResults, RawRow, RowOutcome, StatusMarkers, Username};

/// 有效行至少需要的单元格数（第 2 列状态、第 3 列类型）
const MIN_CELLS: usize = 3;

/// 结果表分析
pub struct ResultExtractor {
    rows: Locator,
    markers: StatusMarkers,
}

impl ResultExtractor {
    pub fn new(rows: Locator, markers: StatusMarkers) -> Self {
        Self { rows, markers }
    }

    /// 读取并分类结果表的所有行
    pub async fn analyze_table(&self, automation: &dyn Automation) -> AppResult<ExtractedResults> {
        info!("🔎 正在检查用户结果表...");

        let rows = automation.collect_rows(&self.rows, ROW_KEY_ATTRIBUTE).await?;

        let mut results = ExtractedResults::default();
        for row in &rows {
            if let Some((username, outcome)) = self.classify_row(row) {
                results.push(username, outcome);
            }
        }

        info!("➕ {} 个创作者加入已验证名单", results.verified.len());
        info!("🚫 {} 个创作者加入黑名单", results.blocked.len());

        Ok(results)
    }

    /// 单行分类；单元格不足或没有行标识时返回 `None`
    pub fn classify_row(&self, row: &RawRow) -> Option<(Username, RowOutcome)> {
        if row.cells.len() < MIN_CELLS {
            debug!("跳过不完整的行: {:?}", row);
            return None;
        }

        let Some(username) = row.key.as_deref().and_then(Username::parse) else {
            warn!("⚠️ 结果行缺少用户名，已跳过: {:?}", row.cells);
            return None;
        };

        Some((username, self.markers.classify(&row.cells[1], &row.cells[2])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::ScriptedAutomation;

    fn extractor() -> ResultExtractor {
        ResultExtractor::new(
            Locator::xpath("结果行", "//tr[@data-row-key]"),
            StatusMarkers {
                available_status: "Disponível".to_string(),
                regular_type: "Regular".to_string(),
            },
        )
    }

    fn user(raw: &str) -> Username {
        Username::parse(raw).unwrap()
    }

    #[test]
    fn test_short_rows_are_neither() {
        let ex = extractor();
        assert_eq!(ex.classify_row(&RawRow::new("a", &["", "Disponível"])), None);
        assert_eq!(ex.classify_row(&RawRow::new("a", &[])), None);
    }

    #[test]
    fn test_row_without_key_is_skipped() {
        let row = RawRow {
            key: None,
            cells: vec!["".into(), "Disponível".into(), "Regular".into()],
        };
        assert_eq!(extractor().classify_row(&row), None);
    }

    #[test]
    fn test_key_is_normalized() {
        let row = RawRow::new("@ana", &["", "Disponível", "Regular"]);
        assert_eq!(extractor().classify_row(&row), Some((user("ana"), RowOutcome::Verified)));
    }

    #[tokio::test]
    async fn test_analyze_table_partitions_in_row_order() {
        let automation = ScriptedAutomation::new();
        automation.set_rows(vec![
            RawRow::new("a", &["", "Disponível", "Regular"]),
            RawRow::new("x", &["só uma"]),
            RawRow::new("c", &["", "Indisponível", "Regular"]),
            RawRow::new("d", &["", "Disponível", "Regular", "extra"]),
            RawRow::new("e", &["", "Disponível", "Agência"]),
            RawRow::new("a", &["", "Disponível", "Regular"]),
        ]);

        let results = extractor().analyze_table(&automation).await.unwrap();

        assert_eq!(results.verified, vec![user("a"), user("d"), user("a")]);
        assert_eq!(results.blocked, vec![user("c"), user("e")]);
    }
}
