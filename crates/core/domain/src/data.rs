//! 设备遥测记录与其分类枚举。

use crate::thresholds::StatusThresholds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 设备运行状态（由温度与压力推导）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentStatus {
    Normal,
    Warning,
    Critical,
}

impl EquipmentStatus {
    /// 按默认阈值判定状态。
    pub fn classify(temperature: f64, pressure: f64) -> Self {
        Self::classify_with(&StatusThresholds::default(), temperature, pressure)
    }

    /// 按给定阈值判定状态：Critical 优先于 Warning。
    pub fn classify_with(thresholds: &StatusThresholds, temperature: f64, pressure: f64) -> Self {
        if temperature > thresholds.critical_temperature
            || pressure > thresholds.critical_pressure
        {
            Self::Critical
        } else if temperature > thresholds.warning_temperature
            || pressure > thresholds.warning_pressure
        {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 设备类别。
///
/// 已知类别显式建模；源数据中的其他取值原样保存在 `Other` 中，
/// 空值或缺列统一归为 `Unknown`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquipmentType {
    Reactor,
    Pump,
    HeatExchanger,
    Separator,
    Unknown,
    Other(String),
}

impl EquipmentType {
    /// 从源文本解析类别（文本已去除首尾空白）。
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "Unknown" => Self::Unknown,
            "Reactor" => Self::Reactor,
            "Pump" => Self::Pump,
            "Heat Exchanger" => Self::HeatExchanger,
            "Separator" => Self::Separator,
            other => Self::Other(other.to_string()),
        }
    }

    /// 展示与统计使用的标签。
    pub fn label(&self) -> &str {
        match self {
            Self::Reactor => "Reactor",
            Self::Pump => "Pump",
            Self::HeatExchanger => "Heat Exchanger",
            Self::Separator => "Separator",
            Self::Unknown => "Unknown",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EquipmentType {
    fn from(value: String) -> Self {
        Self::from_label(value.trim())
    }
}

impl From<EquipmentType> for String {
    fn from(value: EquipmentType) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 可被强制置零的数值列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericField {
    Flowrate,
    Pressure,
    Temperature,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [Self::Flowrate, Self::Pressure, Self::Temperature];
}

/// 单行设备遥测记录（解析后不可变）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    /// `row-<行号>`，行号从表头之后的第一行记为 1。
    pub id: String,
    pub timestamp: String,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub status: EquipmentStatus,
    /// 解析失败被置零的数值列。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coerced: Vec<NumericField>,
    /// 未识别的列，原样保留，不参与计算。
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl EquipmentRecord {
    /// 某数值列是否由解析失败置零而来。
    pub fn is_coerced(&self, field: NumericField) -> bool {
        self.coerced.contains(&field)
    }

    /// 是否缺失 equipment_id 或流量非数值（质量评分口径）。
    pub fn is_incomplete(&self) -> bool {
        self.equipment_id.is_empty() || self.is_coerced(NumericField::Flowrate)
    }
}
