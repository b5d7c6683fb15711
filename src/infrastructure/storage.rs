// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::settings::StorageSettings;
use crate::domain::models::record::Record;
use crate::domain::repositories::storage_repository::{
    SeenRepository, SnapshotRepository, StorageError,
};
use crate::domain::services::deduplication::SeenSet;

/// 解析已保存的去重状态
///
/// 支持换行分隔的ID列表、`{id: true}` 形式的 JSON 对象以及 JSON 字符串数组。
/// 内容无法解析时返回 `None`
pub fn parse_seen(content: &str) -> Option<SeenSet> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Some(SeenSet::new());
    }

    if trimmed.starts_with('{') {
        let map: serde_json::Map<String, Value> = serde_json::from_str(trimmed).ok()?;
        return Some(
            map.into_iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .map(|(k, _)| k)
                .collect(),
        );
    }

    if trimmed.starts_with('[') {
        let ids: Vec<String> = serde_json::from_str(trimmed).ok()?;
        return Some(ids.into_iter().filter(|id| !id.is_empty()).collect());
    }

    Some(
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// 先写临时文件再原子替换目标文件
async fn write_atomically(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| StorageError::Other(format!("invalid path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// 基于本地文件的去重状态存储
pub struct FileSeenStore {
    path: PathBuf,
}

impl FileSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeenRepository for FileSeenStore {
    async fn load(&self) -> SeenSet {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No dedup state at {}, starting empty", self.path.display());
                return SeenSet::new();
            }
            Err(e) => {
                warn!(
                    "Failed to read dedup state {}: {}; starting empty",
                    self.path.display(),
                    e
                );
                return SeenSet::new();
            }
        };

        match parse_seen(&content) {
            Some(seen) => {
                debug!("Loaded {} seen ids from {}", seen.len(), self.path.display());
                seen
            }
            None => {
                warn!(
                    "Dedup state {} is corrupt; starting empty",
                    self.path.display()
                );
                SeenSet::new()
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<(), StorageError> {
        let map: BTreeMap<&str, bool> = seen.iter().map(|id| (id.as_str(), true)).collect();
        let data = serde_json::to_vec_pretty(&map)?;
        write_atomically(&self.path, &data).await
    }
}

/// 基于本地文件的快照存储
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotStore {
    async fn save_snapshot(&self, records: &[Record]) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(records)?;
        write_atomically(&self.path, &data).await
    }

    async fn load_snapshot(&self) -> Result<Vec<Record>, StorageError> {
        match fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// 根据配置创建文件存储
pub fn create_file_stores(settings: &StorageSettings) -> (FileSeenStore, FileSnapshotStore) {
    (
        FileSeenStore::new(&settings.seen_path),
        FileSnapshotStore::new(&settings.snapshot_path),
    )
}

/// 测试用的内存存储实现（用于单元测试）
#[derive(Default)]
pub struct InMemoryStore {
    seen: tokio::sync::RwLock<SeenSet>,
    snapshot: tokio::sync::RwLock<Vec<Record>>,
    saves: std::sync::atomic::AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seen(seen: SeenSet) -> Self {
        Self {
            seen: tokio::sync::RwLock::new(seen),
            ..Default::default()
        }
    }

    /// `save` 被调用的次数
    pub fn save_count(&self) -> usize {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl SeenRepository for InMemoryStore {
    async fn load(&self) -> SeenSet {
        self.seen.read().await.clone()
    }

    async fn save(&self, seen: &SeenSet) -> Result<(), StorageError> {
        *self.seen.write().await = seen.clone();
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryStore {
    async fn save_snapshot(&self, records: &[Record]) -> Result<(), StorageError> {
        *self.snapshot.write().await = records.to_vec();
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Vec<Record>, StorageError> {
        Ok(self.snapshot.read().await.clone())
    }
}
