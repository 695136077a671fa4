//! 会话状态服务
//!
//! 把散落的键值读写收敛为显式操作：
//! - 当前会话（记录批次 + 摘要）的 load/save/clear
//! - 有上限的历史列表（新的在前），淘汰条目时同步清理其归档批次
//! - 归档记录批次的读写与清理

use crate::error::StorageError;
use crate::keys::{self, LAST_SESSION_DATA, LAST_SESSION_SUMMARY, UPLOAD_HISTORY};
use crate::traits::KeyValueStore;
use domain::thresholds::HISTORY_LIMIT;
use domain::{DatasetSummary, EquipmentRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 当前会话内容。
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSession {
    pub records: Vec<EquipmentRecord>,
    pub summary: DatasetSummary,
}

/// 一次历史插入的结果。
///
/// 历史列表已写入；`unpurged` 为淘汰后归档批次清理失败的条目。
#[derive(Debug, Default)]
pub struct HistoryUpdate {
    pub evicted: Vec<String>,
    pub unpurged: Vec<(String, StorageError)>,
}

/// 会话状态服务（可克隆，内部共享同一存储）。
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    history_limit: usize,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_history_limit(store, HISTORY_LIMIT)
    }

    /// 自定义历史上限（最小为 1）。
    pub fn with_history_limit(store: Arc<dyn KeyValueStore>, history_limit: usize) -> Self {
        Self {
            store,
            history_limit: history_limit.max(1),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }

    /// 读取当前会话；记录与摘要任一缺失视为无会话。
    pub async fn load_current(&self) -> Result<Option<CurrentSession>, StorageError> {
        let records = self.read_json::<Vec<EquipmentRecord>>(LAST_SESSION_DATA).await?;
        let summary = self.read_json::<DatasetSummary>(LAST_SESSION_SUMMARY).await?;
        Ok(match (records, summary) {
            (Some(records), Some(summary)) => Some(CurrentSession { records, summary }),
            _ => None,
        })
    }

    pub async fn current_summary(&self) -> Result<Option<DatasetSummary>, StorageError> {
        self.read_json(LAST_SESSION_SUMMARY).await
    }

    /// 写入当前会话（记录与摘要）。
    pub async fn save_current(
        &self,
        records: &[EquipmentRecord],
        summary: &DatasetSummary,
    ) -> Result<(), StorageError> {
        self.write_json(LAST_SESSION_DATA, records).await?;
        self.write_json(LAST_SESSION_SUMMARY, summary).await
    }

    /// 仅更新当前会话摘要。
    pub async fn save_current_summary(&self, summary: &DatasetSummary) -> Result<(), StorageError> {
        self.write_json(LAST_SESSION_SUMMARY, summary).await
    }

    /// 清空当前会话；历史与归档不受影响。
    pub async fn clear_current(&self) -> Result<(), StorageError> {
        self.store.remove(LAST_SESSION_DATA).await?;
        self.store.remove(LAST_SESSION_SUMMARY).await?;
        Ok(())
    }

    pub async fn history(&self) -> Result<Vec<DatasetSummary>, StorageError> {
        Ok(self
            .read_json::<Vec<DatasetSummary>>(UPLOAD_HISTORY)
            .await?
            .unwrap_or_default())
    }

    pub async fn find_history_entry(
        &self,
        summary_id: &str,
    ) -> Result<Option<DatasetSummary>, StorageError> {
        Ok(self
            .history()
            .await?
            .into_iter()
            .find(|entry| entry.id == summary_id))
    }

    /// 插入到历史列表头部，超出上限的旧条目被淘汰并清理其归档批次。
    ///
    /// 只有历史列表写入失败时返回 `Err`；归档清理失败记入 `unpurged`。
    pub async fn push_history(
        &self,
        summary: &DatasetSummary,
    ) -> Result<HistoryUpdate, StorageError> {
        let previous = self.history().await?;
        let mut updated = Vec::with_capacity(previous.len() + 1);
        updated.push(summary.clone());
        updated.extend(
            previous
                .iter()
                .filter(|entry| entry.id != summary.id)
                .cloned(),
        );
        updated.truncate(self.history_limit);
        self.write_json(UPLOAD_HISTORY, &updated).await?;

        let mut outcome = HistoryUpdate::default();
        for entry in previous {
            if updated.iter().any(|kept| kept.id == entry.id) {
                continue;
            }
            if let Err(err) = self.purge_archived(&entry.id).await {
                outcome.unpurged.push((entry.id.clone(), err));
            }
            outcome.evicted.push(entry.id);
        }
        Ok(outcome)
    }

    /// 按 id 替换历史条目，返回是否找到。
    pub async fn replace_history_entry(
        &self,
        summary: &DatasetSummary,
    ) -> Result<bool, StorageError> {
        let mut history = self.history().await?;
        let Some(slot) = history.iter_mut().find(|entry| entry.id == summary.id) else {
            return Ok(false);
        };
        *slot = summary.clone();
        self.write_json(UPLOAD_HISTORY, &history).await?;
        Ok(true)
    }

    pub async fn archive_records(
        &self,
        summary_id: &str,
        records: &[EquipmentRecord],
    ) -> Result<(), StorageError> {
        self.write_json(&keys::dataset_key(summary_id), records).await
    }

    pub async fn load_archived(
        &self,
        summary_id: &str,
    ) -> Result<Option<Vec<EquipmentRecord>>, StorageError> {
        self.read_json(&keys::dataset_key(summary_id)).await
    }

    pub async fn purge_archived(&self, summary_id: &str) -> Result<bool, StorageError> {
        self.store.remove(&keys::dataset_key(summary_id)).await
    }

    /// 清理不在历史列表中的归档批次，返回被清理的 id。
    pub async fn purge_orphans(&self) -> Result<Vec<String>, StorageError> {
        let history = self.history().await?;
        let mut purged = Vec::new();
        for id in self.archived_ids().await? {
            if history.iter().any(|entry| entry.id == id) {
                continue;
            }
            self.purge_archived(&id).await?;
            purged.push(id);
        }
        Ok(purged)
    }

    /// 当前存储中的全部归档 id。
    pub async fn archived_ids(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .store
            .keys()
            .await?
            .iter()
            .filter_map(|key| keys::parse_dataset_key(key).map(str::to_string))
            .collect())
    }
}
