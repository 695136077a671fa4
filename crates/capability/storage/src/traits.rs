//! 存储接口 Trait 定义
//!
//! 持久化存储只暴露字符串键值接口，值统一为 JSON 文本；
//! 具体键布局见 [`crate::keys`]，会话语义见 [`crate::session`]。

use crate::error::StorageError;
use async_trait::async_trait;

/// 键值存储接口
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键值，不存在返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 写入键值（覆盖）
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// 删除键，返回是否存在
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// 列出全部键（按字典序）
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}
