// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::stream_event::StreamEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// 上报器关闭错误
///
/// 事件流的消费端已断开连接，爬取循环应尽快停止
#[derive(Debug, Error)]
#[error("Event stream consumer disconnected")]
pub struct ReporterClosed;

/// 流事件上报器
///
/// 包装事件通道的发送端，保证事件按发送顺序到达消费端。
/// 消费端断开后所有发送都会失败，调用方以此作为停止信号，
/// 这是当前唯一的取消机制。
#[derive(Clone)]
pub struct StreamReporter {
    tx: mpsc::Sender<StreamEvent>,
}

impl StreamReporter {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }

    /// 创建上报器及其配对的事件接收端
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    /// 发送单个事件
    ///
    /// # 返回值
    ///
    /// * `Err(ReporterClosed)` - 消费端已断开
    pub async fn emit(&self, event: StreamEvent) -> Result<(), ReporterClosed> {
        self.tx.send(event).await.map_err(|_| ReporterClosed)
    }

    /// 按顺序发送一组事件
    pub async fn emit_all(&self, events: Vec<StreamEvent>) -> Result<(), ReporterClosed> {
        for event in events {
            self.emit(event).await?;
        }
        Ok(())
    }
}
