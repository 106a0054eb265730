//! # Creator Invite Bot
//!
//! 批量把用户名填进邀请表单，读取校验结果，写入"已验证 / 黑名单"两个名单文件。
//! 名单只追加，所以中途退出后重新运行会从上次的位置继续。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `Automation` - 找元素 / 点击 / 读写 / 跑脚本 / 枚举表格行
//! - `PageDriver` - 基于 chromiumoxide 的实现
//! - `OperatorSignal` - 人工"继续"信号（终端 Enter）
//!
//! ### ② 业务能力层（Services）
//! - `set_store` - 名单文件的读取、追加、去重
//! - `candidate_resolver` - 计算剩余可处理的用户
//! - `BatchSubmitter` - 填输入框并提交
//! - `ChallengeGate` - 验证码检测与等待
//! - `ResultExtractor` - 结果表分析
//!
//! ### ③ 流程层（Workflow）
//! - `BatchCtx` - 批次上下文
//! - `BatchFlow` - 单批的各个阶段
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 初始化与资源管理
//! - `orchestrator/invite_loop` - 主循环状态机

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Automation, ChannelSignal, Locator, OperatorSignal, PageDriver};
pub use models::Username;
pub use orchestrator::{App, InviteLoop, RunSummary};
