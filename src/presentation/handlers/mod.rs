// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 处理器模块
///
/// 包含HTTP端点的请求处理器
pub mod scrape_handler;
