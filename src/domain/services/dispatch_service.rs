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

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::domain::models::crawl_job::{CrawlJob, CrawlMode, SessionCredentials};
use crate::domain::models::stream_event::StreamEvent;
use crate::domain::services::crawl_service::CrawlService;
use crate::domain::services::reporter::StreamReporter;
use crate::engines::traits::PageFetcher;
use tracing::{info, warn};

/// 调度服务
///
/// 将请求的模式和参数映射为目标列表URL序列，并按顺序对每个目标
/// 驱动爬取状态机。单个目标的失败不会中止整个作业。
pub struct DispatchService;

impl DispatchService {
    /// 根据模式和参数生成目标列表URL序列
    ///
    /// 缺少所选模式要求的参数时返回空序列而非错误；
    /// 不校验提交者名称的语法，无效名称只会得到零结果。
    ///
    /// # 参数
    ///
    /// * `archive_root` - 存档站点根地址
    /// * `mode` - 爬取模式
    /// * `notifier` - 单个提交者名称，仅single模式使用
    /// * `notifier_list` - 提交者名称列表，仅mass模式使用
    pub fn target_urls(
        archive_root: &str,
        mode: CrawlMode,
        notifier: Option<&str>,
        notifier_list: Option<&[String]>,
    ) -> Vec<String> {
        match mode {
            CrawlMode::Single => notifier
                .map(|name| vec![format!("{}/archive/notifier={}?", archive_root, name)])
                .unwrap_or_default(),
            CrawlMode::Mass => notifier_list
                .map(|names| {
                    names
                        .iter()
                        .map(|name| format!("{}/archive/notifier={}?", archive_root, name))
                        .collect()
                })
                .unwrap_or_default(),
            CrawlMode::Special => vec![format!("{}/archive/special=1/", archive_root)],
            CrawlMode::Archive => vec![format!("{}/archive/", archive_root)],
        }
    }

    /// 从入站请求构造爬取作业
    pub fn build_job(request: ScrapeRequestDto, archive_root: &str) -> CrawlJob {
        let targets = Self::target_urls(
            archive_root,
            request.mode,
            request.notifier.as_deref(),
            request.notifier_list.as_deref(),
        );
        let credentials = SessionCredentials {
            session_id: request.session_id,
            session_token: request.session_token,
        };
        CrawlJob::new(request.mode, credentials, targets)
    }

    /// 按顺序爬取作业的全部目标URL
    ///
    /// 每个目标独立运行状态机；目标因验证码、会话过期或网络错误
    /// 提前停止时作业继续处理下一个目标。全部目标处理完毕后恰好
    /// 发送一个作业完成状态事件。
    pub async fn run_job<F: PageFetcher>(
        job: &CrawlJob,
        service: &CrawlService<F>,
        reporter: &StreamReporter,
    ) {
        info!(job_id = %job.id, mode = ?job.mode, targets = job.targets.len(), "Starting crawl job");

        for base_url in &job.targets {
            if service
                .crawl_target(base_url, &job.credentials, reporter)
                .await
                .is_err()
            {
                // Consumer dropped the stream; stop making upstream requests
                warn!(job_id = %job.id, "Event stream closed, abandoning crawl job");
                return;
            }
        }

        // Emitted even when individual targets stopped early on errors
        if reporter
            .emit(StreamEvent::status("Scraping completed"))
            .await
            .is_err()
        {
            warn!(job_id = %job.id, "Event stream closed before completion status");
        }
        info!(job_id = %job.id, "Crawl job finished");
    }
}
