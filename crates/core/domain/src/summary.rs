//! 数据集摘要与洞察结果。

use crate::thresholds::PENDING_CLASSIFICATION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 摘要分类：洞察返回前为 `Pending`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    #[default]
    Pending,
    Labelled(String),
}

impl Classification {
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => PENDING_CLASSIFICATION,
            Self::Labelled(label) => label,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<String> for Classification {
    fn from(value: String) -> Self {
        if value == PENDING_CLASSIFICATION {
            Self::Pending
        } else {
            Self::Labelled(value)
        }
    }
}

impl From<Classification> for String {
    fn from(value: Classification) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 洞察协作方返回的叙述文本与分类标签。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub narrative: String,
    pub classification: String,
}

/// 一次分析运行产出的统计摘要。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub id: String,
    pub file_name: String,
    pub upload_date: String,
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub outlier_count: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub data_quality_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<String>,
    #[serde(default)]
    pub classification: Classification,
}

impl DatasetSummary {
    /// 合并洞察结果；重复合并同一结果得到相同摘要。
    pub fn apply_insight(&mut self, insight: &Insight) {
        self.ai_insights = Some(insight.narrative.clone());
        self.classification = Classification::from(insight.classification.clone());
    }

    /// 返回合并洞察后的副本。
    pub fn with_insight(mut self, insight: &Insight) -> Self {
        self.apply_insight(insight);
        self
    }

    pub fn is_enriched(&self) -> bool {
        self.ai_insights.is_some()
    }
}

/// 各运行状态的记录数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

impl StatusBreakdown {
    pub fn total(&self) -> usize {
        self.normal + self.warning + self.critical
    }
}
