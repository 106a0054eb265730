//! 邀请页面的元素定位
//!
//! 页面结构相关的内容集中在这里，流程代码只引用字段名。

use crate::config::Config;
use crate::infrastructure::Locator;

/// 结果表行标识属性
pub const ROW_KEY_ATTRIBUTE: &str = "data-row-key";

/// 邀请流程用到的全部定位
#[derive(Debug, Clone)]
pub struct Selectors {
    /// "Recrutar criadores" 菜单
    pub recruit_creators: Locator,
    /// "Convidar criadores" 入口
    pub invite_creators: Locator,
    /// 用户名输入框
    pub textarea: Locator,
    /// 下一步按钮
    pub next_button: Locator,
    /// 返回上一步
    pub previous_button: Locator,
    /// 结果页标题，出现即表示校验完成
    pub selection_screen: Locator,
    /// 验证码提示
    pub captcha: Locator,
    /// 结果表的行
    pub result_rows: Locator,
}

impl Selectors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recruit_creators: Locator::xpath("Recrutar criadores", "//span[text()='Recrutar criadores']"),
            invite_creators: Locator::xpath("Convidar criadores", "//span[text()='Convidar criadores']"),
            textarea: Locator::xpath(
                "输入框",
                "//textarea[contains(@placeholder,'Insira até 30 criadores')]",
            ),
            next_button: Locator::xpath("下一步按钮", "//button[@data-id='invite-host-next']"),
            previous_button: Locator::xpath("Anterior", "//span[text()='Anterior']"),
            selection_screen: Locator::xpath(
                "结果页",
                "//span[text()='Selecione os criadores para convidar']",
            ),
            captcha: Locator::xpath("验证码", format!("//span[contains(text(),{})]", xpath_literal(&config.captcha_text))),
            result_rows: Locator::xpath("结果行", format!("//tr[@{}]", ROW_KEY_ATTRIBUTE)),
        }
    }
}

/// 把任意文本写成 XPath 字符串字面量
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
