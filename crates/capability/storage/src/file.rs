//! 单文件 JSON 键值存储
//!
//! 所有键值保存在一个 JSON 对象文件中，每次写入整体重写
//! （先写临时文件再 rename），供命令行在多次调用之间保留会话。

use crate::error::StorageError;
use crate::traits::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// 文件键值存储
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: Option<u64>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// 打开（或新建）存储文件
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Self::open_with_quota(path, None).await
    }

    /// 打开存储文件并限制序列化后的文件大小
    pub async fn open_with_quota(
        path: impl Into<PathBuf>,
        quota_bytes: Option<u64>,
    ) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            quota_bytes,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写盘；`shrinking` 为真时不检查配额，保证删除总能释放空间。
    async fn persist(
        &self,
        entries: &BTreeMap<String, String>,
        shrinking: bool,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(entries)?;
        if let Some(quota) = self.quota_bytes.filter(|_| !shrinking) {
            if bytes.len() as u64 > quota {
                return Err(StorageError::quota_exceeded(format!(
                    "quota exceeded: {} > {} bytes",
                    bytes.len(),
                    quota
                )));
            }
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        let shrinking = entries
            .get(key)
            .is_some_and(|old| value.len() <= old.len());
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        // 落盘成功后才替换内存状态，失败时保持原样。
        self.persist(&next, shrinking).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next, true).await?;
        *entries = next;
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().await;
        Ok(entries.keys().cloned().collect())
    }
}
