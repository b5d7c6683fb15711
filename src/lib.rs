// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 将数据源、去重、通知与存储组合为一次监控运行
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 渲染表面、筛选枚举器与记录数据源
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如文件存储、消息网关与指标
pub mod infrastructure;

/// 表示层模块
///
/// 聊天命令路由、会话状态机与命令处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
