//! 稳定的视图 DTO 与响应契约（供图表、表格与打印报告等展示层消费）。

use domain::{DatasetSummary, EquipmentRecord, StatusBreakdown};
use serde::Serialize;

/// 标准响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 当前登录状态。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub username: Option<String>,
    pub is_authenticated: bool,
}

impl SessionDto {
    pub fn from_username(username: Option<String>) -> Self {
        Self {
            is_authenticated: username.is_some(),
            username,
        }
    }
}

/// 仪表盘视图：当前会话的摘要、状态分布与全部记录。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub summary: DatasetSummary,
    pub status_breakdown: StatusBreakdown,
    pub records: Vec<EquipmentRecord>,
}

/// 上传结果：基础统计先行返回，洞察可能仍在处理中。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadView {
    pub summary: DatasetSummary,
    pub status_breakdown: StatusBreakdown,
    pub skipped_rows: usize,
    pub insight_status: InsightStatus,
}

/// 洞察合并状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    Pending,
    Applied,
    Stale,
    Failed,
    Skipped,
}

/// 历史条目（不含记录明细）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub limit: usize,
    pub entries: Vec<DatasetSummary>,
}

/// 可打印报告。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub generated_at: String,
    pub summary: DatasetSummary,
    pub status_breakdown: StatusBreakdown,
    /// 仅 Critical 记录，便于报告首页列出。
    pub critical_records: Vec<EquipmentRecord>,
    pub records: Vec<EquipmentRecord>,
}

/// 清空当前会话的结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedDto {
    pub cleared: bool,
}
