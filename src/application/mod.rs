// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 将数据源、去重、通知与存储组合为一次完整的监控运行
pub mod use_cases;
