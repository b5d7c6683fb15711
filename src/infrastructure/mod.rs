// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供外部服务集成：本地文件存储、消息网关与运行指标
pub mod metrics;
pub mod services;
pub mod storage;
