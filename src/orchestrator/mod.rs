//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、打开浏览器、持有 Browser 和 PageDriver
//!
//! ### `invite_loop` - 邀请主循环
//! - 状态机：开始 → 取批 → 提交 → 验证码 → 等结果 → 落盘 → 取批 … → 去重结束
//! - 每轮重新读取名单文件
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 Browser)
//!     ↓
//! invite_loop (处理 Vec<Username>，按批推进)
//!     ↓
//! workflow::BatchFlow (处理单个批次的各阶段)
//!     ↓
//! services (能力层：提交 / 验证码 / 结果表 / 名单文件)
//!     ↓
//! infrastructure (基础设施：Automation / OperatorSignal)
//! ```

pub mod app;
pub mod invite_loop;

pub use app::App;
pub use invite_loop::{InviteLoop, LoopState, RunSummary};
