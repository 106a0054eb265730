//! 页面驱动 - 基础设施层
//!
//! 持有唯一的 page 资源，用 chromiumoxide 实现 [`Automation`]。
//! 查询类操作统一走页面内 JS（XPath 定位），键盘类操作走 CDP 输入事件，
//! 这样 React 一类的前端能收到真实的输入。

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::automation::{Automation, Locator};
use crate::models::RawRow;

/// 页面驱动
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 把自动化原语翻译成 JS / CDP 调用
/// - 不认识用户名和名单
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 表达式并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 表达式并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 在元素上执行一段返回布尔值的脚本，元素不存在时报错
    async fn eval_on_element(&self, locator: &Locator, body: &str) -> AppResult<()> {
        let js_code = format!(
            "(() => {{ const el = {}; if (!el) return false; {} return true; }})()",
            node_expr(&locator.xpath)?,
            body
        );
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::script(locator.to_string(), "元素不存在"))
        }
    }
}

#[async_trait]
impl Automation for PageDriver {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn is_present(&self, locator: &Locator) -> AppResult<bool> {
        let js_code = format!("{} !== null", node_expr(&locator.xpath)?);
        self.eval_as(js_code).await
    }

    async fn try_click(&self, locator: &Locator) -> AppResult<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                if (!el) return false;
                const target = el.closest('button') || el;
                if (target.disabled || target.getAttribute('aria-disabled') === 'true') return false;
                if (!el.getClientRects().length) return false;
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return true;
            }})()
            "#,
            node_expr(&locator.xpath)?
        );
        let clicked: bool = self.eval_as(js_code).await?;
        debug!("点击 {}: {}", locator, clicked);
        Ok(clicked)
    }

    async fn read_value(&self, locator: &Locator) -> AppResult<String> {
        let js_code = format!(
            "(() => {{ const el = {}; if (!el) return null; return ('value' in el) ? el.value : el.textContent; }})()",
            node_expr(&locator.xpath)?
        );
        self.eval_as::<Option<String>>(js_code)
            .await?
            .ok_or_else(|| AppError::script(locator.to_string(), "元素不存在"))
    }

    async fn select_all_and_delete(&self, locator: &Locator) -> AppResult<()> {
        self.eval_on_element(locator, "el.focus(); if (el.select) el.select();")
            .await?;
        let element = self.page.find_xpath(locator.xpath.clone()).await?;
        element.press_key("Delete").await?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> AppResult<()> {
        self.eval_on_element(
            locator,
            "el.focus(); el.value = ''; el.dispatchEvent(new Event('change', { bubbles: true }));",
        )
        .await
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> AppResult<()> {
        self.eval_on_element(locator, "el.focus();").await?;
        self.page.execute(InsertTextParams::new(text)).await?;
        Ok(())
    }

    async fn run_script(&self, locator: &Locator, function_declaration: &str) -> AppResult<()> {
        let body = format!("({})(el);", function_declaration);
        self.eval_on_element(locator, &body).await
    }

    async fn collect_rows(&self, rows: &Locator, key_attribute: &str) -> AppResult<Vec<RawRow>> {
        let js_code = format!(
            r#"
            (() => {{
                const snap = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                const rows = [];
                for (let i = 0; i < snap.snapshotLength; i++) {{
                    const row = snap.snapshotItem(i);
                    rows.push({{
                        key: row.getAttribute({}),
                        cells: Array.from(row.querySelectorAll('td')).map(td => (td.innerText || '').trim()),
                    }});
                }}
                return rows;
            }})()
            "#,
            serde_json::to_string(&rows.xpath)?,
            serde_json::to_string(key_attribute)?
        );
        let collected: Vec<RawRow> = self.eval_as(js_code).await?;
        debug!("{} 共 {} 行", rows, collected.len());
        Ok(collected)
    }
}

/// 生成按 XPath 取第一个节点的 JS 表达式
fn node_expr(xpath: &str) -> AppResult<String> {
    Ok(format!(
        "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
        serde_json::to_string(xpath)?
    ))
}
