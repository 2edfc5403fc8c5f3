// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;
use tracing::error;

/// 流事件
///
/// 推送给调用方的所有事件类型，封闭枚举保证消费端可以穷尽匹配。
/// 序列化为带`type`标签的JSON对象，事件顺序即发送顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// 进度事件
    #[serde(rename_all = "camelCase")]
    Progress {
        /// 当前页码
        current_page: u32,
        /// 总页数（预估值，非真实总数）
        total_pages: u32,
        /// 进度百分比，0-100
        percentage: u32,
    },
    /// 即将抓取的页面URL
    Url { url: String },
    /// 提取出的单个域名结果
    Result { url: String },
    /// 状态消息
    Status { message: String },
    /// 错误消息
    Error { message: String },
}

impl StreamEvent {
    pub fn progress(current_page: u32, total_pages: u32, percentage: u32) -> Self {
        Self::Progress {
            current_page,
            total_pages,
            percentage,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    pub fn result(url: impl Into<String>) -> Self {
        Self::Result { url: url.into() }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// 序列化为一行NDJSON文本（含换行符）
    pub fn to_ndjson_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(e) => {
                // Serialization of a plain enum cannot realistically fail,
                // but the stream must never panic mid-response.
                error!("Failed to serialize stream event: {}", e);
                String::new()
            }
        }
    }
}
