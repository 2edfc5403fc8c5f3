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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、上游存档站点和爬取循环的所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 上游存档站点配置
    pub upstream: UpstreamSettings,
    /// 爬取循环配置
    pub crawl: CrawlSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 上游存档站点配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    /// 存档站点根地址（不含尾部斜杠）
    pub archive_root: String,
    /// 单次页面请求超时时间（秒）
    pub request_timeout: u64,
}

/// 爬取循环配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 单个目标URL的最大翻页数
    pub max_pages: u32,
    /// 用于进度百分比计算的预估总页数
    ///
    /// 与max_pages是两个独立的配置项，当前默认值相同
    pub progress_estimate_total: u32,
    /// 翻页之间的固定延迟（毫秒），用于限制对上游站点的请求频率
    pub page_delay_ms: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default upstream settings
            .set_default("upstream.archive_root", "http://zone-h.org")?
            .set_default("upstream.request_timeout", 30)?
            // Default crawl loop settings
            .set_default("crawl.max_pages", 50)?
            .set_default("crawl.progress_estimate_total", 50)?
            .set_default("crawl.page_delay_ms", 1000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ZONECRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}
