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

use crate::domain::models::crawl_job::SessionCredentials;
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// HTTP客户端构建失败
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// 页面抓取分类结果
///
/// 每次页面请求恰好产生一个结果。传输层失败不作为错误向上抛出，
/// 而是归类为`NetworkError`交给状态机决定终止。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// 成功获取页面标记
    Ok(String),
    /// 非2xx的HTTP状态码，非致命
    HttpError(u16),
    /// 页面包含验证码表单，当前目标URL的爬取终止
    CaptchaDetected,
    /// 页面包含会话过期标记，当前目标URL的爬取终止
    SessionExpired,
    /// 传输层失败（DNS、超时、连接重置等），当前目标URL的爬取终止
    NetworkError(String),
}

/// 页面抓取引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取并分类单个页面
    async fn fetch_page(&self, url: &str, credentials: &SessionCredentials) -> PageOutcome;
}
