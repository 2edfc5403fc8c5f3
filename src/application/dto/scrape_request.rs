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

use crate::domain::models::crawl_job::CrawlMode;
use serde::{Deserialize, Serialize};

/// 爬取请求数据传输对象
///
/// 封装客户端发起的存档爬取请求。凭据如何获取不在本系统范围内，
/// 这里只接收两个不透明的Cookie值。
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequestDto {
    /// PHPSESSID Cookie值
    pub session_id: String,
    /// ZHE Cookie值
    pub session_token: String,
    /// 爬取模式
    pub mode: CrawlMode,
    /// 单个提交者名称，仅mode为single时使用
    pub notifier: Option<String>,
    /// 提交者名称列表，仅mode为mass时使用
    pub notifier_list: Option<Vec<String>>,
}
