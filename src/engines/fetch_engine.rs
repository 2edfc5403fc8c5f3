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
use crate::engines::traits::{EngineError, PageFetcher, PageOutcome};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::time::Duration;
use tracing::debug;

/// 上游站点要求浏览器形态的User-Agent，否则直接拒绝会话
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 验证码表单标记，出现即说明会话被质询
const CAPTCHA_MARKER: &str = r#"<input type="text" name="captcha""#;

/// 会话过期页面的固定前缀
const SESSION_EXPIRED_MARKER: &str = r#"<html><body>-<script type="text/javascript""#;

/// 抓取引擎
///
/// 基于reqwest实现的带会话Cookie的页面抓取引擎。
/// 本层不做任何重试：除HTTP状态码错误外的失败都会终止当前目标的爬取。
pub struct FetchEngine {
    client: reqwest::Client,
}

impl FetchEngine {
    /// 创建新的抓取引擎实例
    ///
    /// # 参数
    ///
    /// * `request_timeout` - 单次页面请求的超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchEngine)` - 新的引擎实例
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(request_timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client })
    }

    fn cookie_header(credentials: &SessionCredentials) -> String {
        format!(
            "PHPSESSID={}; ZHE={}",
            credentials.session_id, credentials.session_token
        )
    }
}

#[async_trait]
impl PageFetcher for FetchEngine {
    /// 执行单次页面抓取并分类响应
    ///
    /// # 参数
    ///
    /// * `url` - 完整的页面URL
    /// * `credentials` - 会话凭据，作为Cookie随请求发送
    ///
    /// # 返回值
    ///
    /// 页面抓取分类结果，见`PageOutcome`
    async fn fetch_page(&self, url: &str, credentials: &SessionCredentials) -> PageOutcome {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&Self::cookie_header(credentials)) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => {
                // Control characters in a credential can never authenticate
                return PageOutcome::NetworkError(
                    "Invalid characters in session credentials".to_string(),
                );
            }
        }

        let response = match self.client.get(url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => return PageOutcome::NetworkError(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return PageOutcome::HttpError(status.as_u16());
        }

        let markup = match response.text().await {
            Ok(markup) => markup,
            Err(e) => return PageOutcome::NetworkError(e.to_string()),
        };

        if markup.contains(CAPTCHA_MARKER) {
            debug!(url, "Captcha challenge in response body");
            return PageOutcome::CaptchaDetected;
        }

        if markup.contains(SESSION_EXPIRED_MARKER) {
            debug!(url, "Session expired marker in response body");
            return PageOutcome::SessionExpired;
        }

        PageOutcome::Ok(markup)
    }
}
