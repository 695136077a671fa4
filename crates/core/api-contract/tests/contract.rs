use api_contract::{DashboardView, InsightStatus, SessionDto, UploadView};
use domain::{Classification, DatasetSummary, StatusBreakdown};
use std::collections::BTreeMap;

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
        type_distribution: BTreeMap::from([("Pump".to_string(), 1)]),
        data_quality_score: 100,
        ai_insights: None,
        classification: Classification::Pending,
    }
}

#[test]
fn dashboard_view_is_camel_case() {
    let view = DashboardView {
        summary: summary(),
        status_breakdown: StatusBreakdown {
            normal: 1,
            warning: 0,
            critical: 0,
        },
        records: Vec::new(),
    };
    let value = serde_json::to_value(view).expect("serialize");
    assert!(value.get("statusBreakdown").is_some());
    assert!(value.get("status_breakdown").is_none());
    assert_eq!(value["summary"]["dataQualityScore"], 100);
}

#[test]
fn upload_view_reports_insight_status() {
    let view = UploadView {
        summary: summary(),
        status_breakdown: StatusBreakdown::default(),
        skipped_rows: 2,
        insight_status: InsightStatus::Stale,
    };
    let value = serde_json::to_value(view).expect("serialize");
    assert_eq!(value["insightStatus"], "stale");
    assert_eq!(value["skippedRows"], 2);
}

#[test]
fn session_dto_tracks_authentication() {
    let signed_in = SessionDto::from_username(Some("operator".to_string()));
    assert!(signed_in.is_authenticated);
    let value = serde_json::to_value(SessionDto::from_username(None)).expect("serialize");
    assert_eq!(value["isAuthenticated"], false);
}
