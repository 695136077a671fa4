//! 领域模型：设备记录、数据集摘要与启发式常量。

pub mod data;
pub mod summary;
pub mod thresholds;

pub use data::{EquipmentRecord, EquipmentStatus, EquipmentType, NumericField};
pub use summary::{Classification, DatasetSummary, Insight, StatusBreakdown};
pub use thresholds::StatusThresholds;
