// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 调度服务（dispatch_service）：将请求模式映射为目标URL序列并驱动整个作业
/// - 爬取服务（crawl_service）：单个目标URL的逐页爬取状态机
/// - 提取服务（extraction_service）：从页面标记中提取域名的启发式逻辑
/// - 事件上报器（reporter）：向调用方的事件流有序写入事件
pub mod crawl_service;
pub mod dispatch_service;
pub mod extraction_service;
pub mod reporter;
