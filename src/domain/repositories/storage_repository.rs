// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;
use crate::domain::services::deduplication::SeenSet;
use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 已通知ID集合的存储
///
/// `load` 永不失败：状态缺失或损坏时返回空集合；
/// `save` 整体替换已保存的集合，中断时不会留下半写状态
#[async_trait]
pub trait SeenRepository: Send + Sync {
    /// 加载已通知的ID集合
    async fn load(&self) -> SeenSet;

    /// 替换已保存的ID集合
    async fn save(&self, seen: &SeenSet) -> Result<(), StorageError>;
}

/// 最近一次提取结果的快照存储
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// 保存完整快照
    async fn save_snapshot(&self, records: &[Record]) -> Result<(), StorageError>;

    /// 读取最近的快照，不存在时返回空列表
    async fn load_snapshot(&self) -> Result<Vec<Record>, StorageError>;
}
