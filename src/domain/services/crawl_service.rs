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

use crate::config::settings::CrawlSettings;
use crate::domain::models::crawl_job::{PageRequest, SessionCredentials};
use crate::domain::models::stream_event::StreamEvent;
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::reporter::{ReporterClosed, StreamReporter};
use crate::engines::traits::{PageFetcher, PageOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 爬取循环配置
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// 单个目标URL的翻页上限
    pub max_pages: u32,
    /// 进度百分比的预估总页数分母
    pub progress_estimate_total: u32,
    /// 翻页之间的固定延迟
    pub page_delay: Duration,
}

impl From<&CrawlSettings> for CrawlConfig {
    fn from(settings: &CrawlSettings) -> Self {
        Self {
            max_pages: settings.max_pages,
            progress_estimate_total: settings.progress_estimate_total,
            page_delay: Duration::from_millis(settings.page_delay_ms),
        }
    }
}

/// 页面处理后的状态转移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 立即翻到下一页（HTTP错误路径不插入延迟）
    Continue,
    /// 延迟后翻到下一页（正常处理完一页）
    ContinueAfterDelay,
    /// 停止爬取当前目标URL
    Stop,
}

/// 进度百分比，四舍五入到整数并限制在0-100范围内
///
/// 翻页上限可以配置得比预估总页数大，超出预估的页面按100%上报
pub fn percentage(page: u32, estimate_total: u32) -> u32 {
    if estimate_total == 0 {
        return 100;
    }
    (((page as f64 / estimate_total as f64) * 100.0).round() as u32).min(100)
}

/// 单页抓取结果的纯状态转移函数
///
/// 消费一次页面抓取的分类结果，产出状态转移和要按序上报的事件。
/// 不做任何IO，可以在无网络环境下独立测试。
///
/// # 参数
///
/// * `page` - 当前页码
/// * `url` - 当前页面完整URL，用于错误消息
/// * `outcome` - 页面抓取分类结果
pub fn apply_outcome(page: u32, url: &str, outcome: &PageOutcome) -> (Transition, Vec<StreamEvent>) {
    match outcome {
        PageOutcome::HttpError(status) => (
            // Transient upstream failure: report and keep paging
            Transition::Continue,
            vec![StreamEvent::error(format!("HTTP {} for {}", status, url))],
        ),
        PageOutcome::CaptchaDetected => (
            Transition::Stop,
            vec![StreamEvent::error(
                "Captcha detected - please update ZHE cookie",
            )],
        ),
        PageOutcome::SessionExpired => (
            Transition::Stop,
            vec![StreamEvent::error(
                "Session error - please update PHPSESSID and ZHE cookies",
            )],
        ),
        PageOutcome::NetworkError(message) => (
            Transition::Stop,
            vec![StreamEvent::error(format!(
                "Error on page {}: {}",
                page, message
            ))],
        ),
        PageOutcome::Ok(markup) => {
            let fragments = ExtractionService::cell_fragments(markup);
            if fragments.is_empty() {
                // Normal, successful end of the listing
                let events = vec![
                    StreamEvent::status(format!("No more results found at page {}", page)),
                    StreamEvent::progress(page, page, 100),
                ];
                return (Transition::Stop, events);
            }

            let domains = ExtractionService::page_domains(&fragments);
            let mut events: Vec<StreamEvent> = domains
                .iter()
                .map(|domain| StreamEvent::result(domain.clone()))
                .collect();
            events.push(StreamEvent::status(format!(
                "Page {} completed - found {} URLs",
                page,
                domains.len()
            )));
            (Transition::ContinueAfterDelay, events)
        }
    }
}

/// 爬取服务
///
/// 驱动单个目标URL的逐页爬取状态机：
/// `Start → Fetching(page) → Classifying → {Extracting → Reporting →
/// Fetching(page+1)} | Stopped`
pub struct CrawlService<F: PageFetcher> {
    /// 页面抓取引擎
    fetcher: Arc<F>,
    /// 爬取循环配置
    config: CrawlConfig,
}

impl<F: PageFetcher> CrawlService<F> {
    /// 创建新的爬取服务实例
    pub fn new(fetcher: Arc<F>, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    /// 爬取单个目标URL的全部分页
    ///
    /// 页码从1开始单调递增，直到翻页上限或某个终止条件。
    /// 所有事件按规定顺序写入上报器。
    ///
    /// # 返回值
    ///
    /// * `Err(ReporterClosed)` - 消费端断开，调用方应放弃整个作业
    pub async fn crawl_target(
        &self,
        base_url: &str,
        credentials: &SessionCredentials,
        reporter: &StreamReporter,
    ) -> Result<(), ReporterClosed> {
        let estimate = self.config.progress_estimate_total;
        reporter.emit(StreamEvent::progress(0, estimate, 0)).await?;

        for page in 1..=self.config.max_pages {
            let request = PageRequest::new(base_url, page);
            let url = request.url();

            reporter.emit(StreamEvent::url(url.clone())).await?;
            reporter
                .emit(StreamEvent::progress(page, estimate, percentage(page, estimate)))
                .await?;

            debug!(page, url = %url, "Fetching archive page");
            let outcome = self.fetcher.fetch_page(&url, credentials).await;

            let (transition, events) = apply_outcome(page, &url, &outcome);
            reporter.emit_all(events).await?;

            match transition {
                Transition::Stop => {
                    debug!(page, base_url, "Crawl finished for target");
                    break;
                }
                Transition::ContinueAfterDelay => {
                    // Bounds the request rate against the upstream service
                    tokio::time::sleep(self.config.page_delay).await;
                }
                Transition::Continue => {}
            }
        }

        Ok(())
    }
}
