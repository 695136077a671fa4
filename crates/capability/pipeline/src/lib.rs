//! 编排层：读取 -> 解析 -> 分析 -> 提交会话，随后异步合并洞察。
//!
//! 提交与洞察合并共用一把锁，并通过代次（generation）判断洞察结果是否过期：
//! 票据签发后若又有新的批次提交，返回结果直接丢弃。
//! 存储写入失败只记录日志与计数，不影响已算出的统计结果。

use api_contract::{DashboardView, ReportView};
use chemviz_analysis::{AnalysisError, AnalysisThresholds, Analyzer, status_breakdown};
use chemviz_ingest::{CsvSource, FileSource, IngestError, SampleSource};
use chemviz_insight::InsightProvider;
use chemviz_normalize::{CsvParser, ParseError, ParseReport};
use chemviz_storage::{SessionStore, StorageError};
use chemviz_telemetry::{
    record_analysis_completed, record_analysis_failed, record_enrichment_applied,
    record_enrichment_failed, record_enrichment_stale, record_history_evictions,
    record_storage_write_failure,
};
use chrono::{SecondsFormat, Utc};
use domain::thresholds::SAMPLE_ROWS;
use domain::{DatasetSummary, EquipmentRecord, EquipmentStatus, StatusBreakdown, StatusThresholds};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Pipeline 处理错误。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("archived data for {id} is no longer available")]
    ArchivedDataMissing { id: String },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Pipeline 参数。
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sample_rows: usize,
    pub status_thresholds: StatusThresholds,
    pub analysis_thresholds: AnalysisThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rows: SAMPLE_ROWS,
            status_thresholds: StatusThresholds::default(),
            analysis_thresholds: AnalysisThresholds::default(),
        }
    }
}

impl PipelineConfig {
    fn sanitized(mut self) -> Self {
        if self.sample_rows == 0 {
            self.sample_rows = 1;
        }
        self
    }
}

/// 洞察合并票据：提交时签发，记录当时的代次与摘要。
#[derive(Debug, Clone)]
pub struct EnrichmentTicket {
    pub generation: u64,
    pub summary: DatasetSummary,
}

impl EnrichmentTicket {
    pub fn summary_id(&self) -> &str {
        &self.summary.id
    }
}

/// 一次分析运行的结果（提交之后、洞察合并之前）。
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub records: Vec<EquipmentRecord>,
    pub summary: DatasetSummary,
    pub status_breakdown: StatusBreakdown,
    pub report: ParseReport,
    /// 会话与历史是否全部写入成功。
    pub persisted: bool,
    pub ticket: EnrichmentTicket,
}

/// 洞察合并结果。
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    Applied(DatasetSummary),
    /// 票据签发后又提交了新批次，结果被丢弃。
    Stale,
    Failed(String),
}

struct PipelineInner {
    parser: CsvParser,
    analyzer: Analyzer,
    insight: Arc<dyn InsightProvider>,
    session: SessionStore,
    config: PipelineConfig,
    generation: AtomicU64,
    commit: Mutex<()>,
}

/// Pipeline 入口。
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

impl Pipeline {
    pub fn new(session: SessionStore, insight: Arc<dyn InsightProvider>) -> Self {
        Self::with_config(session, insight, PipelineConfig::default())
    }

    pub fn with_config(
        session: SessionStore,
        insight: Arc<dyn InsightProvider>,
        config: PipelineConfig,
    ) -> Self {
        let config = config.sanitized();
        let inner = PipelineInner {
            parser: CsvParser::with_thresholds(config.status_thresholds),
            analyzer: Analyzer::with_thresholds(config.analysis_thresholds),
            insight,
            session,
            config,
            generation: AtomicU64::new(0),
            commit: Mutex::new(()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn history_limit(&self) -> usize {
        self.inner.session.history_limit()
    }

    /// 读取并分析一个输入源，提交为当前会话并写入历史。
    ///
    /// 解析或分析失败时不写入任何内容。
    pub async fn ingest(&self, source: &dyn CsvSource) -> Result<AnalysisRun, PipelineError> {
        let payload = source.read().await?;
        let batch = match self.inner.parser.parse_with_report(&payload.text) {
            Ok(batch) => batch,
            Err(err) => {
                record_analysis_failed();
                warn!(file_name = %payload.file_name, error = %err, "csv rejected");
                return Err(err.into());
            }
        };
        let summary = match self.inner.analyzer.analyze(&batch.records, &payload.file_name) {
            Ok(summary) => {
                record_analysis_completed();
                summary
            }
            Err(err) => {
                record_analysis_failed();
                warn!(file_name = %payload.file_name, error = %err, "analysis rejected");
                return Err(err.into());
            }
        };

        let (ticket, persisted) = self.commit(&batch.records, &summary).await;
        info!(
            summary_id = %summary.id,
            file_name = %summary.file_name,
            rows = summary.total_count,
            skipped = batch.report.skipped_rows,
            persisted,
            "dataset committed"
        );
        Ok(AnalysisRun {
            status_breakdown: status_breakdown(&batch.records),
            records: batch.records,
            summary,
            report: batch.report,
            persisted,
            ticket,
        })
    }

    pub async fn upload_file(
        &self,
        path: impl Into<PathBuf>,
    ) -> Result<AnalysisRun, PipelineError> {
        self.ingest(&FileSource::new(path)).await
    }

    /// 生成样例数据并按普通上传处理。
    pub async fn load_demo(&self) -> Result<AnalysisRun, PipelineError> {
        self.ingest(&SampleSource::new(self.inner.config.sample_rows))
            .await
    }

    async fn commit(
        &self,
        records: &[EquipmentRecord],
        summary: &DatasetSummary,
    ) -> (EnrichmentTicket, bool) {
        let _guard = self.inner.commit.lock().await;
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = &self.inner.session;

        let mut persisted = true;
        if let Err(err) = session.save_current(records, summary).await {
            log_storage_failure("save current session", &summary.id, &err);
            persisted = false;
        }
        match self.archive_with_history(records, summary).await {
            Ok(evicted) if !evicted.is_empty() => {
                record_history_evictions(evicted.len() as u64);
                info!(evicted = ?evicted, "history entries evicted");
            }
            Ok(_) => {}
            Err(err) => {
                log_storage_failure("archive dataset", &summary.id, &err);
                persisted = false;
            }
        }

        let ticket = EnrichmentTicket {
            generation,
            summary: summary.clone(),
        };
        (ticket, persisted)
    }

    async fn archive_with_history(
        &self,
        records: &[EquipmentRecord],
        summary: &DatasetSummary,
    ) -> Result<Vec<String>, StorageError> {
        let session = &self.inner.session;
        session.archive_records(&summary.id, records).await?;
        let update = match session.push_history(summary).await {
            Ok(update) => update,
            Err(err) => {
                // 历史未写入时清理刚归档的批次，避免孤儿数据。
                if let Err(purge_err) = session.purge_archived(&summary.id).await {
                    log_storage_failure("purge orphan dataset", &summary.id, &purge_err);
                }
                return Err(err);
            }
        };

        // 淘汰批次清理失败不回滚历史，留给孤儿清理重试。
        for (id, err) in &update.unpurged {
            log_storage_failure("purge evicted dataset", id, err);
        }
        match session.purge_orphans().await {
            Ok(purged) if !purged.is_empty() => {
                info!(purged = ?purged, "orphan datasets purged");
            }
            Ok(_) => {}
            Err(err) => log_storage_failure("purge orphan datasets", &summary.id, &err),
        }
        Ok(update.evicted)
    }

    /// 调用洞察服务并合并结果。
    ///
    /// 失败不致命：摘要保持待分析状态。
    pub async fn enrich(&self, ticket: &EnrichmentTicket) -> EnrichmentOutcome {
        let insight = match self.inner.insight.enrich(&ticket.summary).await {
            Ok(insight) => insight,
            Err(err) => {
                record_enrichment_failed();
                warn!(summary_id = %ticket.summary_id(), error = %err, "insight request failed");
                return EnrichmentOutcome::Failed(err.to_string());
            }
        };

        let _guard = self.inner.commit.lock().await;
        let current = self.inner.generation.load(Ordering::SeqCst);
        if current != ticket.generation {
            record_enrichment_stale();
            info!(
                summary_id = %ticket.summary_id(),
                ticket = ticket.generation,
                current,
                "stale insight discarded"
            );
            return EnrichmentOutcome::Stale;
        }

        let enriched = ticket.summary.clone().with_insight(&insight);
        self.apply_enrichment(&enriched).await;
        record_enrichment_applied();
        info!(
            summary_id = %enriched.id,
            classification = %enriched.classification,
            "insight applied"
        );
        EnrichmentOutcome::Applied(enriched)
    }

    /// 后台执行 `enrich`。
    pub fn spawn_enrichment(&self, ticket: EnrichmentTicket) -> JoinHandle<EnrichmentOutcome> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.enrich(&ticket).await })
    }

    async fn apply_enrichment(&self, enriched: &DatasetSummary) {
        let session = &self.inner.session;
        // 当前会话已切换到其他批次时只更新历史条目。
        match session.current_summary().await {
            Ok(Some(current)) if current.id == enriched.id => {
                if let Err(err) = session.save_current_summary(enriched).await {
                    log_storage_failure("save enriched summary", &enriched.id, &err);
                }
            }
            Ok(_) => {}
            Err(err) => log_storage_failure("read current summary", &enriched.id, &err),
        }
        if let Err(err) = session.replace_history_entry(enriched).await {
            log_storage_failure("update history entry", &enriched.id, &err);
        }
    }

    /// 当前会话视图；未加载数据时返回 `None`。
    pub async fn dashboard(&self) -> Result<Option<DashboardView>, PipelineError> {
        Ok(self
            .inner
            .session
            .load_current()
            .await?
            .map(|current| DashboardView {
                status_breakdown: status_breakdown(&current.records),
                summary: current.summary,
                records: current.records,
            }))
    }

    pub async fn history(&self) -> Result<Vec<DatasetSummary>, PipelineError> {
        Ok(self.inner.session.history().await?)
    }

    /// 从历史条目与归档批次恢复当前会话。
    ///
    /// 条目或批次缺失时返回 `ArchivedDataMissing`，当前会话保持不变。
    pub async fn view_archived(&self, summary_id: &str) -> Result<DashboardView, PipelineError> {
        let _guard = self.inner.commit.lock().await;
        let session = &self.inner.session;
        let missing = || PipelineError::ArchivedDataMissing {
            id: summary_id.to_string(),
        };
        let summary = session
            .find_history_entry(summary_id)
            .await?
            .ok_or_else(missing)?;
        let records = session
            .load_archived(summary_id)
            .await?
            .ok_or_else(missing)?;
        session.save_current(&records, &summary).await?;
        info!(summary_id, "archived dataset restored");
        Ok(DashboardView {
            status_breakdown: status_breakdown(&records),
            summary,
            records,
        })
    }

    /// 清空当前会话；历史与归档保留。返回清空前是否有数据。
    pub async fn clear(&self) -> Result<bool, PipelineError> {
        let _guard = self.inner.commit.lock().await;
        let session = &self.inner.session;
        let had_session = session.current_summary().await?.is_some();
        session.clear_current().await?;
        Ok(had_session)
    }

    /// 基于当前会话生成可打印报告。
    pub async fn report(&self) -> Result<Option<ReportView>, PipelineError> {
        let Some(current) = self.inner.session.load_current().await? else {
            return Ok(None);
        };
        let critical_records = current
            .records
            .iter()
            .filter(|record| record.status == EquipmentStatus::Critical)
            .cloned()
            .collect();
        Ok(Some(ReportView {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status_breakdown: status_breakdown(&current.records),
            summary: current.summary,
            critical_records,
            records: current.records,
        }))
    }
}

fn log_storage_failure(operation: &str, summary_id: &str, err: &StorageError) {
    record_storage_write_failure();
    error!(operation, summary_id, kind = ?err.kind(), error = %err, "storage write failed");
}
