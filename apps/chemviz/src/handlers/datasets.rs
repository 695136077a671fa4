//! 数据集相关 handlers
//!
//! - `upload` / `demo`：分析并提交为当前会话，随后等待洞察合并
//! - `dashboard` / `report`：当前会话视图，未加载数据时 `data` 为 null
//! - `history` / `view`：历史列表与归档恢复
//! - `clear`：清空当前会话，历史保留
//! - `sample`：直接输出样例 CSV 文本（非 JSON）

use crate::AppState;
use crate::utils::response::{CommandResult, pipeline_failure, success};
use api_contract::{ClearedDto, HistoryView, InsightStatus, UploadView};
use chemviz_ingest::generate_sample_rows;
use chemviz_pipeline::{AnalysisRun, EnrichmentOutcome};
use std::path::PathBuf;
use tracing::{info, warn};

pub async fn upload(state: &AppState, path: PathBuf, no_insights: bool) -> CommandResult {
    let run = state
        .pipeline
        .upload_file(path)
        .await
        .map_err(pipeline_failure)?;
    finish_run(state, run, no_insights).await
}

pub async fn demo(state: &AppState, no_insights: bool) -> CommandResult {
    let run = state.pipeline.load_demo().await.map_err(pipeline_failure)?;
    finish_run(state, run, no_insights).await
}

async fn finish_run(state: &AppState, run: AnalysisRun, no_insights: bool) -> CommandResult {
    let AnalysisRun {
        summary,
        status_breakdown,
        report,
        ticket,
        ..
    } = run;
    if no_insights || !state.config.insights_enabled {
        return success(UploadView {
            summary,
            status_breakdown,
            skipped_rows: report.skipped_rows,
            insight_status: InsightStatus::Skipped,
        });
    }

    info!(summary_id = %summary.id, "base statistics ready, awaiting insights");
    let (summary, insight_status) = match state.pipeline.spawn_enrichment(ticket).await {
        Ok(EnrichmentOutcome::Applied(enriched)) => (enriched, InsightStatus::Applied),
        Ok(EnrichmentOutcome::Stale) => (summary, InsightStatus::Stale),
        Ok(EnrichmentOutcome::Failed(_)) => (summary, InsightStatus::Failed),
        Err(err) => {
            warn!(error = %err, "insight task aborted");
            (summary, InsightStatus::Pending)
        }
    };
    success(UploadView {
        summary,
        status_breakdown,
        skipped_rows: report.skipped_rows,
        insight_status,
    })
}

pub async fn dashboard(state: &AppState) -> CommandResult {
    let view = state.pipeline.dashboard().await.map_err(pipeline_failure)?;
    success(view)
}

pub async fn history(state: &AppState) -> CommandResult {
    let entries = state.pipeline.history().await.map_err(pipeline_failure)?;
    success(HistoryView {
        limit: state.pipeline.history_limit(),
        entries,
    })
}

/// 恢复历史批次；批次缺失时当前会话保持不变
pub async fn view(state: &AppState, id: &str) -> CommandResult {
    let view = state
        .pipeline
        .view_archived(id)
        .await
        .map_err(pipeline_failure)?;
    success(view)
}

pub async fn report(state: &AppState) -> CommandResult {
    let view = state.pipeline.report().await.map_err(pipeline_failure)?;
    success(view)
}

pub async fn clear(state: &AppState) -> CommandResult {
    let cleared = state.pipeline.clear().await.map_err(pipeline_failure)?;
    success(ClearedDto { cleared })
}

pub fn sample(state: &AppState, rows: Option<usize>) -> CommandResult {
    let rows = rows.unwrap_or(state.config.sample_rows).max(1);
    Ok(generate_sample_rows(rows))
}
