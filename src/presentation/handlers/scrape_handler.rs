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

use axum::body::Body;
use axum::extract::{Extension, Json};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::stream_event::StreamEvent;
use crate::domain::services::crawl_service::{CrawlConfig, CrawlService};
use crate::domain::services::dispatch_service::DispatchService;
use crate::domain::services::reporter::StreamReporter;
use crate::engines::fetch_engine::FetchEngine;

/// 事件通道缓冲大小
///
/// 缓冲只是平滑写出，背压最终由HTTP响应流承担
const EVENT_BUFFER: usize = 32;

/// 创建爬取作业并以NDJSON流式返回事件
///
/// 响应体是持久连接上的逐行JSON事件流，作业完成状态事件发出后
/// 通道关闭，连接随之关闭；不发送显式的流结束哨兵。
/// 客户端断开时发送端失败，爬取循环随之停止。
pub async fn create_scrape(
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse {
    let job = DispatchService::build_job(payload, &settings.upstream.archive_root);
    let crawl_config = CrawlConfig::from(&settings.crawl);
    let request_timeout = Duration::from_secs(settings.upstream.request_timeout);

    let (reporter, rx) = StreamReporter::channel(EVENT_BUFFER);

    tokio::spawn(async move {
        match FetchEngine::new(request_timeout) {
            Ok(engine) => {
                let service = CrawlService::new(Arc::new(engine), crawl_config);
                DispatchService::run_job(&job, &service, &reporter).await;
            }
            Err(e) => {
                // Job boundary: any unexpected failure becomes one error event
                error!(job_id = %job.id, "Failed to initialize fetch engine: {}", e);
                let _ = reporter
                    .emit(StreamEvent::error(format!("Internal error: {}", e)))
                    .await;
            }
        }
    });

    let body = Body::from_stream(
        ReceiverStream::new(rx)
            .map(|event| Ok::<_, Infallible>(Bytes::from(event.to_ndjson_line()))),
    );

    (
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
}
