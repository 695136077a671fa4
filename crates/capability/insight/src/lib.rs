//! 洞察协作方：接收摘要，异步返回叙述文本与分类标签。
//!
//! 这里只固定接口契约；`MockInsightProvider` 返回固定文本，不代表业务逻辑。

use async_trait::async_trait;
use domain::{DatasetSummary, Insight};
use std::time::Duration;
use tracing::debug;

/// 洞察调用错误。
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight provider unavailable: {0}")]
    Unavailable(String),
}

/// 洞察协作方抽象。
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn enrich(&self, summary: &DatasetSummary) -> Result<Insight, InsightError>;
}

const MOCK_NARRATIVE: &str = "The dataset demonstrates stable operational parameters across the majority of equipment units, with average flowrates and pressures remaining within nominal design limits. Detected temperature outliers may indicate sensor drift or localized overheating events and should be reviewed.\n\nSafety assessment indicates a low-risk profile for this batch. Minor variance in the flowrate distribution suggests routine maintenance checks on upstream feeds.";
const MOCK_CLASSIFICATION: &str = "Standard Processing Batch";

/// 占位洞察服务：模拟外部延迟后返回固定结果。
#[derive(Debug, Clone)]
pub struct MockInsightProvider {
    delay: Duration,
}

impl MockInsightProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// 无延迟实例（用于测试与离线命令）。
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for MockInsightProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl InsightProvider for MockInsightProvider {
    async fn enrich(&self, summary: &DatasetSummary) -> Result<Insight, InsightError> {
        debug!(
            summary_id = %summary.id,
            delay_ms = self.delay.as_millis() as u64,
            "mock insight requested"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Insight {
            narrative: MOCK_NARRATIVE.to_string(),
            classification: MOCK_CLASSIFICATION.to_string(),
        })
    }
}

/// 总是失败的洞察服务（用于降级路径接线与测试）。
#[derive(Debug, Clone, Default)]
pub struct UnavailableInsightProvider;

#[async_trait]
impl InsightProvider for UnavailableInsightProvider {
    async fn enrich(&self, _summary: &DatasetSummary) -> Result<Insight, InsightError> {
        Err(InsightError::Unavailable("insights disabled".to_string()))
    }
}
