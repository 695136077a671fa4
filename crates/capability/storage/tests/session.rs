use async_trait::async_trait;
use chemviz_storage::{
    InMemoryKeyValueStore, KeyValueStore, SessionStore, StorageError, StorageErrorKind,
};
use domain::{
    Classification, DatasetSummary, EquipmentRecord, EquipmentStatus, EquipmentType,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn summary(id: &str) -> DatasetSummary {
    DatasetSummary {
        id: id.to_string(),
        file_name: format!("{id}.csv"),
        upload_date: "2024-01-01T00:00:00Z".to_string(),
        total_count: 1,
        avg_flowrate: 1.0,
        avg_pressure: 1.0,
        avg_temperature: 1.0,
        outlier_count: 0,
        type_distribution: BTreeMap::from([("Pump".to_string(), 1)]),
        data_quality_score: 100,
        ai_insights: None,
        classification: Classification::Pending,
    }
}

fn records() -> Vec<EquipmentRecord> {
    vec![EquipmentRecord {
        id: "row-1".to_string(),
        timestamp: "2024-01-01".to_string(),
        equipment_id: "EQ-1".to_string(),
        equipment_type: EquipmentType::Pump,
        flowrate: 1.0,
        pressure: 1.0,
        temperature: 1.0,
        status: EquipmentStatus::Normal,
        coerced: Vec::new(),
        extra: BTreeMap::new(),
    }]
}

fn session() -> (Arc<InMemoryKeyValueStore>, SessionStore) {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let session = SessionStore::new(store.clone());
    (store, session)
}

#[tokio::test]
async fn current_session_round_trip_and_clear() {
    let (_, session) = session();
    assert!(session.load_current().await.expect("load").is_none());

    session
        .save_current(&records(), &summary("1"))
        .await
        .expect("save");
    let current = session.load_current().await.expect("load").expect("current");
    assert_eq!(current.summary.id, "1");
    assert_eq!(current.records, records());

    session.clear_current().await.expect("clear");
    assert!(session.load_current().await.expect("load").is_none());
    assert!(session.current_summary().await.expect("summary").is_none());
}

#[tokio::test]
async fn sixteenth_entry_evicts_only_the_oldest_batch() {
    let (store, session) = session();
    for i in 1..=15 {
        let id = i.to_string();
        session.archive_records(&id, &records()).await.expect("archive");
        let update = session.push_history(&summary(&id)).await.expect("push");
        assert!(update.evicted.is_empty());
    }
    assert_eq!(session.history().await.expect("history").len(), 15);

    session.archive_records("16", &records()).await.expect("archive");
    let update = session.push_history(&summary("16")).await.expect("push");
    assert_eq!(update.evicted, vec!["1".to_string()]);
    assert!(update.unpurged.is_empty());

    let history = session.history().await.expect("history");
    assert_eq!(history.len(), 15);
    assert_eq!(history[0].id, "16");
    assert_eq!(history[14].id, "2");

    assert!(store.get("dataset_1").await.expect("get").is_none());
    let mut archived = session.archived_ids().await.expect("ids");
    archived.sort_by_key(|id| id.parse::<u32>().unwrap_or_default());
    let expected = (2..=16).map(|i| i.to_string()).collect::<Vec<_>>();
    assert_eq!(archived, expected);
}

#[tokio::test]
async fn custom_limit_and_duplicate_ids() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let session = SessionStore::with_history_limit(store, 2);
    session.push_history(&summary("a")).await.expect("push");
    session.push_history(&summary("b")).await.expect("push");
    // 相同 id 重复插入时移动到头部，不占用额外名额。
    let update = session.push_history(&summary("a")).await.expect("push");
    assert!(update.evicted.is_empty());
    let ids = session
        .history()
        .await
        .expect("history")
        .into_iter()
        .map(|entry| entry.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn replace_history_entry_by_id() {
    let (_, session) = session();
    session.push_history(&summary("1")).await.expect("push");
    session.push_history(&summary("2")).await.expect("push");

    let mut enriched = summary("1");
    enriched.ai_insights = Some("text".to_string());
    assert!(session.replace_history_entry(&enriched).await.expect("replace"));
    assert!(!session.replace_history_entry(&summary("9")).await.expect("missing"));

    let entry = session
        .find_history_entry("1")
        .await
        .expect("find")
        .expect("entry");
    assert_eq!(entry.ai_insights.as_deref(), Some("text"));
    let history = session.history().await.expect("history");
    assert_eq!(history[0].id, "2");
}

#[tokio::test]
async fn corrupt_history_is_reported() {
    let (store, session) = session();
    store
        .set("upload_history", "{broken".to_string())
        .await
        .expect("set");
    let err = session.history().await.expect_err("corrupt");
    assert_eq!(err.kind(), StorageErrorKind::Serialization);
}

/// 下一次 `remove` 失败的存储。
struct FlakyRemoveStore {
    inner: InMemoryKeyValueStore,
    fail_next_remove: AtomicBool,
}

impl FlakyRemoveStore {
    fn new() -> Self {
        Self {
            inner: InMemoryKeyValueStore::new(),
            fail_next_remove: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyRemoveStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        if self.fail_next_remove.swap(false, Ordering::SeqCst) {
            return Err(StorageError::new("remove failed"));
        }
        self.inner.remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys().await
    }
}

#[tokio::test]
async fn failed_eviction_purge_keeps_history_write() {
    let store = Arc::new(FlakyRemoveStore::new());
    let session = SessionStore::with_history_limit(store.clone(), 1);
    session.archive_records("a", &records()).await.expect("archive");
    session.push_history(&summary("a")).await.expect("push");

    session.archive_records("b", &records()).await.expect("archive");
    store.fail_next_remove.store(true, Ordering::SeqCst);
    let update = session.push_history(&summary("b")).await.expect("push");
    assert_eq!(update.evicted, vec!["a".to_string()]);
    assert_eq!(update.unpurged.len(), 1);
    assert_eq!(update.unpurged[0].0, "a");

    let history = session.history().await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "b");
    assert!(session.load_archived("b").await.expect("load").is_some());

    assert_eq!(session.purge_orphans().await.expect("sweep"), vec!["a".to_string()]);
    assert_eq!(session.archived_ids().await.expect("ids"), vec!["b".to_string()]);
}
