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

use axum::Extension;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use zonecrawl::config::settings::Settings;
use zonecrawl::presentation::routes;
use zonecrawl::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化配置和日志并启动HTTP服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting zonecrawl...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!(
        archive_root = %settings.upstream.archive_root,
        max_pages = settings.crawl.max_pages,
        "Configuration loaded"
    );

    // 3. Start HTTP server
    let app = routes::routes()
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
