//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - KeyValueStore: InMemoryKeyValueStore（可选字节配额，用于模拟配额超限）

pub mod key_value;

pub use key_value::*;
