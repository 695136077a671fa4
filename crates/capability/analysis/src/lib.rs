//! 记录批次 -> DatasetSummary 的统计分析。
//!
//! 包含均值、温度四分位围栏离群检测、类别分布与数据质量评分。
//! 除 id 与上传时间外，结果只依赖输入记录。

use chrono::{SecondsFormat, Utc};
use domain::thresholds::{
    IQR_FENCE_FACTOR, LOWER_QUARTILE, QUALITY_BASE, QUALITY_INCOMPLETE_PENALTY,
    QUALITY_OUTLIER_PENALTY, UPPER_QUARTILE,
};
use domain::{
    Classification, DatasetSummary, EquipmentRecord, EquipmentStatus, StatusBreakdown,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// 分析错误。
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("dataset is empty")]
    EmptyDataset,
}

/// 分析参数（默认取 `domain::thresholds` 中的常量）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisThresholds {
    pub fence_factor: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
    pub quality_base: i64,
    pub incomplete_penalty: i64,
    pub outlier_penalty: i64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            fence_factor: IQR_FENCE_FACTOR,
            lower_quartile: LOWER_QUARTILE,
            upper_quartile: UPPER_QUARTILE,
            quality_base: QUALITY_BASE,
            incomplete_penalty: QUALITY_INCOMPLETE_PENALTY,
            outlier_penalty: QUALITY_OUTLIER_PENALTY,
        }
    }
}

/// 四分位围栏（闭区间 `[lower, upper]`）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierFence {
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// 数据集分析器。
#[derive(Debug, Default)]
pub struct Analyzer {
    thresholds: AnalysisThresholds,
    last_id: AtomicI64,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: AnalysisThresholds) -> Self {
        Self {
            thresholds,
            last_id: AtomicI64::new(0),
        }
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    /// 生成摘要；空批次直接返回 `EmptyDataset`。
    pub fn analyze(
        &self,
        records: &[EquipmentRecord],
        file_name: &str,
    ) -> Result<DatasetSummary, AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }
        let total_count = records.len();

        let avg_flowrate = mean(records.iter().map(|r| r.flowrate)).unwrap_or_default();
        let avg_pressure = mean(records.iter().map(|r| r.pressure)).unwrap_or_default();
        let avg_temperature = mean(records.iter().map(|r| r.temperature)).unwrap_or_default();

        let temperatures = records.iter().map(|r| r.temperature).collect::<Vec<_>>();
        let outlier_count = quartile_fence(&temperatures, &self.thresholds)
            .map(|fence| count_outliers(&temperatures, &fence))
            .unwrap_or(0);

        let summary = DatasetSummary {
            id: self.next_summary_id(),
            file_name: file_name.to_string(),
            upload_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_count,
            avg_flowrate,
            avg_pressure,
            avg_temperature,
            outlier_count,
            type_distribution: type_distribution(records),
            data_quality_score: quality_score(records, outlier_count, &self.thresholds),
            ai_insights: None,
            classification: Classification::Pending,
        };
        debug!(
            summary_id = %summary.id,
            total_count,
            outlier_count,
            quality = summary.data_quality_score,
            "dataset analyzed"
        );
        Ok(summary)
    }

    /// 基于毫秒时间戳的摘要 id；同一毫秒内的多次分析顺延保证单调递增。
    fn next_summary_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = match self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            }) {
            Ok(previous) | Err(previous) => previous,
        };
        now.max(previous.saturating_add(1)).to_string()
    }
}

/// 算术平均；空序列返回 `None`。
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut count = 0usize;
    let sum = values.fold(0.0, |acc, value| {
        count += 1;
        acc + value
    });
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// 按位次取四分位（不插值）并计算围栏。
pub fn quartile_fence(values: &[f64], thresholds: &AnalysisThresholds) -> Option<OutlierFence> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = sorted[order_index(sorted.len(), thresholds.lower_quartile)];
    let q3 = sorted[order_index(sorted.len(), thresholds.upper_quartile)];
    let iqr = q3 - q1;
    Some(OutlierFence {
        q1,
        q3,
        lower: q1 - thresholds.fence_factor * iqr,
        upper: q3 + thresholds.fence_factor * iqr,
    })
}

fn order_index(len: usize, position: f64) -> usize {
    let index = (len as f64 * position).floor() as usize;
    index.min(len.saturating_sub(1))
}

pub fn count_outliers(values: &[f64], fence: &OutlierFence) -> usize {
    values.iter().filter(|value| fence.is_outlier(**value)).count()
}

/// 按类别标签计数。
pub fn type_distribution(records: &[EquipmentRecord]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution
            .entry(record.equipment_type.label().to_string())
            .or_insert(0) += 1;
    }
    distribution
}

/// 数据质量评分：只做减法，结果落在 `[0, quality_base]` 且不超过 100。
pub fn quality_score(
    records: &[EquipmentRecord],
    outlier_count: usize,
    thresholds: &AnalysisThresholds,
) -> u8 {
    let incomplete = records.iter().filter(|r| r.is_incomplete()).count() as i64;
    let score = thresholds
        .quality_base
        .saturating_sub(incomplete.saturating_mul(thresholds.incomplete_penalty))
        .saturating_sub((outlier_count as i64).saturating_mul(thresholds.outlier_penalty));
    score.clamp(0, thresholds.quality_base.clamp(0, 100)) as u8
}

/// 各状态记录数。
pub fn status_breakdown(records: &[EquipmentRecord]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for record in records {
        match record.status {
            EquipmentStatus::Normal => breakdown.normal += 1,
            EquipmentStatus::Warning => breakdown.warning += 1,
            EquipmentStatus::Critical => breakdown.critical += 1,
        }
    }
    breakdown
}
