// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::repositories::storage_repository::StorageError;

/// 命令处理错误类型
#[derive(Error, Debug)]
pub enum HandlerError {
    /// 存储访问失败
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
