use chemviz_insight::{
    InsightError, InsightProvider, MockInsightProvider, UnavailableInsightProvider,
};
use domain::{Classification, DatasetSummary};
use std::collections::BTreeMap;
use std::time::Duration;

fn summary() -> DatasetSummary {
    DatasetSummary {
        id: "1".to_string(),
        file_name: "batch.csv".to_string(),
        upload_date: "2024-01-01T00:00:00Z".to_string(),
        total_count: 1,
        avg_flowrate: 1.0,
        avg_pressure: 1.0,
        avg_temperature: 1.0,
        outlier_count: 0,
        type_distribution: BTreeMap::new(),
        data_quality_score: 100,
        ai_insights: None,
        classification: Classification::Pending,
    }
}

#[tokio::test(start_paused = true)]
async fn mock_provider_resolves_after_delay() {
    let provider = MockInsightProvider::new(Duration::from_millis(1500));
    let started = tokio::time::Instant::now();
    let insight = provider.enrich(&summary()).await.expect("insight");
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(insight.classification, "Standard Processing Batch");
    assert!(!insight.narrative.is_empty());

    let enriched = summary().with_insight(&insight);
    assert!(enriched.is_enriched());
    assert!(!enriched.classification.is_pending());
}

#[tokio::test]
async fn unavailable_provider_fails() {
    let err = UnavailableInsightProvider
        .enrich(&summary())
        .await
        .expect_err("unavailable");
    assert!(matches!(err, InsightError::Unavailable(_)));
}
