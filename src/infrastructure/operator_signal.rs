//! 操作员信号 - 基础设施层
//!
//! 人工"继续"信号只在两处使用：开始运行、验证码解决后。
//! 等待没有超时，人什么时候回来不由程序决定；关闭信号源即可取消等待。

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 人工继续信号
#[async_trait]
pub trait OperatorSignal: Send {
    /// 阻塞直到操作员发出继续信号
    async fn wait_for_continue(&mut self) -> AppResult<()>;
}

/// 基于通道的信号源
///
/// 发送端每发一个 `()` 放行一次；所有发送端被丢弃后等待返回 `SignalClosed`。
pub struct ChannelSignal {
    rx: mpsc::Receiver<()>,
}

impl ChannelSignal {
    pub fn new(rx: mpsc::Receiver<()>) -> Self {
        Self { rx }
    }

    /// 创建一对发送端 / 信号源
    pub fn pair() -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(8);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl OperatorSignal for ChannelSignal {
    async fn wait_for_continue(&mut self) -> AppResult<()> {
        self.rx.recv().await.ok_or(AppError::SignalClosed)
    }
}

/// 从终端读取信号：每按一次 Enter 放行一次
///
/// 后台任务把 stdin 的每一行转成一个信号，stdin 关闭后信号源随之关闭。
pub fn stdin_signal() -> ChannelSignal {
    let (tx, signal) = ChannelSignal::pair();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            debug!("收到操作员信号");
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });

    signal
}
