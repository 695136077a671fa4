//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - 配额超限（持久化存储拒绝写入）
//! - 文件读写错误
//! - JSON 编解码错误

/// 存储错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    QuotaExceeded,
    Io,
    Serialization,
    Backend,
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(StorageErrorKind::Backend, message)
    }

    pub fn with_kind(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::with_kind(StorageErrorKind::QuotaExceeded, message)
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == StorageErrorKind::QuotaExceeded
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_kind(StorageErrorKind::Serialization, err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::with_kind(StorageErrorKind::Io, err.to_string())
    }
}
