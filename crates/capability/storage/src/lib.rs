//! # ChemViz Storage 模块
//!
//! 本模块提供统一的键值存储抽象与会话状态服务。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`KeyValueStore` 异步键值接口
//! 2. **键布局** (`keys.rs`)：持久化键名与归档键构造
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型（含配额超限）
//! 4. **会话服务** (`session.rs`)：当前会话、历史列表与归档批次
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示，可模拟配额）
//!    - `file.rs`：单文件 JSON 存储（命令行使用）
//!
//! ## 持久化键布局
//!
//! | 键 | 值 |
//! |---|---|
//! | `last_session_data` | 当前记录批次 |
//! | `last_session_summary` | 当前摘要 |
//! | `dataset_<id>` | 历史条目对应的记录批次 |
//! | `upload_history` | 最多 15 条摘要，新的在前 |
//! | `chem_user` | 已登录用户（`{username, isAuthenticated}`） |
//!
//! 所有值均为 JSON 文本。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use chemviz_storage::{InMemoryKeyValueStore, SessionStore};
//! use std::sync::Arc;
//!
//! let session = SessionStore::new(Arc::new(InMemoryKeyValueStore::new()));
//! session.save_current(&records, &summary).await?;
//! let update = session.push_history(&summary).await?;
//! ```
//!
//! ## 设计约束
//!
//! - **显式会话服务**：调用方不直接拼键名，统一通过 `SessionStore`
//! - **无孤儿批次**：历史淘汰与归档清理在同一次 `push_history` 中完成

pub mod error;
pub mod file;
pub mod in_memory;
pub mod keys;
pub mod session;
pub mod traits;

pub use error::*;
pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
pub use session::{CurrentSession, HistoryUpdate, SessionStore};
pub use traits::*;
