use chemviz_telemetry::{
    TelemetryMetrics, init_tracing, metrics, record_enrichment_stale, record_rows_parsed,
};

#[test]
fn fresh_metrics_start_at_zero() {
    let snapshot = TelemetryMetrics::new().snapshot();
    assert_eq!(snapshot.rows_parsed, 0);
    assert_eq!(snapshot.enrichment_stale, 0);
}

#[test]
fn global_counters_accumulate() {
    init_tracing();
    let before = metrics().snapshot();
    record_rows_parsed(3);
    record_enrichment_stale();
    let after = metrics().snapshot();
    assert!(after.rows_parsed >= before.rows_parsed + 3);
    assert!(after.enrichment_stale > before.enrichment_stale);
}
