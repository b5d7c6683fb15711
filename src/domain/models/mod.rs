// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 记录（record）：从列表页提取出的单条数据
/// - 筛选（filter）：筛选轴与筛选上下文
pub mod filter;
pub mod record;
