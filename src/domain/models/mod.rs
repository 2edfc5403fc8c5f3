// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取作业（crawl_job）：一次请求对应的完整爬取作业及其凭据
/// - 流事件（stream_event）：推送给调用方的进度、结果和状态事件
pub mod crawl_job;
pub mod stream_event;
