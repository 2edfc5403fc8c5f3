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

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 爬取模式
///
/// 决定一次作业要爬取哪些存档列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// 按单个提交者名称爬取
    Single,
    /// 按提交者名称列表批量爬取
    Mass,
    /// 爬取特殊存档区
    Special,
    /// 爬取完整存档
    Archive,
}

/// 会话凭据
///
/// 上游存档站点所需的两个不透明Cookie值
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    /// PHPSESSID Cookie值
    pub session_id: String,
    /// ZHE Cookie值
    pub session_token: String,
}

/// 爬取作业
///
/// 每个请求创建一个作业实例，构造后不可变，请求结束即丢弃
#[derive(Debug, Clone)]
pub struct CrawlJob {
    /// 作业ID，仅用于日志关联
    pub id: Uuid,
    /// 爬取模式
    pub mode: CrawlMode,
    /// 会话凭据
    pub credentials: SessionCredentials,
    /// 目标列表URL，按顺序依次爬取
    pub targets: Vec<String>,
}

impl CrawlJob {
    /// 创建新的爬取作业
    pub fn new(mode: CrawlMode, credentials: SessionCredentials, targets: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            credentials,
            targets,
        }
    }
}

/// 页面请求
///
/// 由目标URL和循环计数器确定性派生，不做持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 目标列表的基础URL
    pub base_url: String,
    /// 页码，从1开始单调递增
    pub page_number: u32,
}

impl PageRequest {
    pub fn new(base_url: impl Into<String>, page_number: u32) -> Self {
        Self {
            base_url: base_url.into(),
            page_number,
        }
    }

    /// 完整的页面URL
    ///
    /// 上游站点将页码作为`page=<n>`后缀直接拼接在基础URL之后
    pub fn url(&self) -> String {
        format!("{}page={}", self.base_url, self.page_number)
    }
}
