//! 键值内存实现
//!
//! 使用 RwLock + HashMap 提供线程安全的内存存储。

use crate::error::StorageError;
use crate::traits::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 键值内存存储
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryKeyValueStore {
    /// 创建无配额限制的存储
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    /// 创建带字节配额的存储（键与值的字节数之和）
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// 当前键数量（用于测试）
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前占用字节数
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|map| entries_size(&map))
            .unwrap_or(0)
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

fn entries_size(map: &HashMap<String, String>) -> usize {
    map.iter().map(|(key, value)| key.len() + value.len()).sum()
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(quota) = self.quota_bytes {
            let current = entries_size(&entries);
            let replaced = entries
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let projected = current - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::quota_exceeded(format!(
                    "quota exceeded writing {key}: {projected} > {quota} bytes"
                )));
            }
        }
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut keys = entries.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        Ok(keys)
    }
}
