use chemviz_ingest::{CsvSource, FileSource, IngestError, SampleSource, generate_sample_text};
use chemviz_normalize::parse;
use domain::{EquipmentStatus, EquipmentType};
use std::io::Write;

#[test]
fn sample_text_round_trips_through_parser() {
    for _ in 0..20 {
        let records = parse(&generate_sample_text()).expect("parse sample");
        assert_eq!(records.len(), 50);
        for (index, record) in records.iter().enumerate() {
            assert_eq!(record.id, format!("row-{}", index + 1));
            assert_eq!(record.equipment_id, format!("EQ-{}", 1000 + index));
            assert!(matches!(
                record.equipment_type,
                EquipmentType::Reactor
                    | EquipmentType::Pump
                    | EquipmentType::HeatExchanger
                    | EquipmentType::Separator
            ));
            assert!(record.coerced.is_empty());
            assert!((50.0..=150.0).contains(&record.flowrate));
            assert!((100.0..=600.0).contains(&record.pressure));
            assert!((20.0..=170.0).contains(&record.temperature));
            assert_eq!(
                record.status,
                EquipmentStatus::classify(record.temperature, record.pressure)
            );
        }
    }
}

#[tokio::test]
async fn sample_source_uses_demo_file_name() {
    let payload = SampleSource::new(3).read().await.expect("read");
    assert_eq!(payload.file_name, "demo_batch_001.csv");
    assert_eq!(payload.text.lines().count(), 4);
}

#[tokio::test]
async fn file_source_reads_text() {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("tempfile");
    write!(file, "timestamp,equipment_id\n2024,EQ-1").expect("write");
    let source = FileSource::new(file.path());
    let payload = source.read().await.expect("read");
    assert!(payload.file_name.ends_with(".csv"));
    assert!(payload.text.starts_with("timestamp"));
}

#[tokio::test]
async fn file_source_rejects_binary_content() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).expect("write");
    let err = FileSource::new(file.path())
        .read()
        .await
        .expect_err("invalid utf-8");
    assert!(matches!(err, IngestError::InvalidEncoding(_)));
}

#[tokio::test]
async fn file_source_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = FileSource::new(dir.path().join("absent.csv"))
        .read()
        .await
        .expect_err("missing");
    assert!(matches!(err, IngestError::Read { .. }));
}
