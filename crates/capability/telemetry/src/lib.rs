//! 日志初始化与进程级计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub rows_parsed: u64,
    pub rows_skipped: u64,
    pub analyses_completed: u64,
    pub analyses_failed: u64,
    pub enrichment_applied: u64,
    pub enrichment_stale: u64,
    pub enrichment_failed: u64,
    pub storage_write_failure: u64,
    pub history_evictions: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    rows_parsed: AtomicU64,
    rows_skipped: AtomicU64,
    analyses_completed: AtomicU64,
    analyses_failed: AtomicU64,
    enrichment_applied: AtomicU64,
    enrichment_stale: AtomicU64,
    enrichment_failed: AtomicU64,
    storage_write_failure: AtomicU64,
    history_evictions: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            rows_parsed: AtomicU64::new(0),
            rows_skipped: AtomicU64::new(0),
            analyses_completed: AtomicU64::new(0),
            analyses_failed: AtomicU64::new(0),
            enrichment_applied: AtomicU64::new(0),
            enrichment_stale: AtomicU64::new(0),
            enrichment_failed: AtomicU64::new(0),
            storage_write_failure: AtomicU64::new(0),
            history_evictions: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_parsed: self.rows_parsed.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            analyses_completed: self.analyses_completed.load(Ordering::Relaxed),
            analyses_failed: self.analyses_failed.load(Ordering::Relaxed),
            enrichment_applied: self.enrichment_applied.load(Ordering::Relaxed),
            enrichment_stale: self.enrichment_stale.load(Ordering::Relaxed),
            enrichment_failed: self.enrichment_failed.load(Ordering::Relaxed),
            storage_write_failure: self.storage_write_failure.load(Ordering::Relaxed),
            history_evictions: self.history_evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，输出到 stderr，保持 stdout 只输出结果）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录解析成功的行数。
pub fn record_rows_parsed(count: u64) {
    metrics().rows_parsed.fetch_add(count, Ordering::Relaxed);
}

/// 记录因列数不足被跳过的行数。
pub fn record_rows_skipped(count: u64) {
    metrics().rows_skipped.fetch_add(count, Ordering::Relaxed);
}

/// 记录分析完成次数。
pub fn record_analysis_completed() {
    metrics().analyses_completed.fetch_add(1, Ordering::Relaxed);
}

/// 记录分析失败次数（解析失败或空数据集）。
pub fn record_analysis_failed() {
    metrics().analyses_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录洞察合并次数。
pub fn record_enrichment_applied() {
    metrics().enrichment_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录过期洞察被丢弃次数。
pub fn record_enrichment_stale() {
    metrics().enrichment_stale.fetch_add(1, Ordering::Relaxed);
}

/// 记录洞察调用失败次数。
pub fn record_enrichment_failed() {
    metrics().enrichment_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储写入失败次数（含配额超限）。
pub fn record_storage_write_failure() {
    metrics()
        .storage_write_failure
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录历史淘汰条数。
pub fn record_history_evictions(count: u64) {
    metrics()
        .history_evictions
        .fetch_add(count, Ordering::Relaxed);
}
