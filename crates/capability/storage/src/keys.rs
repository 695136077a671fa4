//! 持久化键布局

/// 当前会话的记录批次
pub const LAST_SESSION_DATA: &str = "last_session_data";
/// 当前会话的摘要
pub const LAST_SESSION_SUMMARY: &str = "last_session_summary";
/// 历史摘要列表（新的在前）
pub const UPLOAD_HISTORY: &str = "upload_history";
/// 已登录用户名
pub const USER_SESSION: &str = "chem_user";

const DATASET_PREFIX: &str = "dataset_";

/// 归档记录批次的键：`dataset_<summary.id>`
pub fn dataset_key(summary_id: &str) -> String {
    format!("{DATASET_PREFIX}{summary_id}")
}

/// 从归档键解析摘要 id
pub fn parse_dataset_key(key: &str) -> Option<&str> {
    key.strip_prefix(DATASET_PREFIX)
}
