// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - identity：由规范地址计算稳定ID
/// - blocklist：屏蔽域名过滤
/// - list_extractor：列表页记录提取
/// - deduplication：新记录计算
/// - notification_service：消息格式化、打包与分发
pub mod blocklist;
pub mod deduplication;
pub mod identity;
pub mod list_extractor;
pub mod notification_service;
