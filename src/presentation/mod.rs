// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 处理HTTP请求和流式响应：
/// - 处理器（handlers）：爬取端点的请求处理和事件流输出
/// - 路由（routes）：应用路由配置
pub mod handlers;
pub mod routes;
