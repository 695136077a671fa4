use chemviz_normalize::{CsvParser, ParseError, parse};
use domain::{EquipmentStatus, EquipmentType};

const HEADER: &str = "timestamp,equipment_id,type,flowrate,pressure,temperature";

#[test]
fn parses_end_to_end_example() {
    let text = "timestamp,equipment_id,type,flowrate,pressure,temperature\n2024-01-01,EQ-1,Pump,80,600,50\n2024-01-01,EQ-2,Pump,80,200,50";
    let records = parse(text).expect("parse");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].status, EquipmentStatus::Critical);
    assert_eq!(records[1].status, EquipmentStatus::Normal);
    assert_eq!(records[0].equipment_type, EquipmentType::Pump);
    assert_eq!(records[0].timestamp, "2024-01-01");
}

#[test]
fn well_formed_rows_get_sequential_ids() {
    let mut text = HEADER.to_string();
    for i in 0..10 {
        text.push_str(&format!("\n2024-01-01,EQ-{i},Reactor,{i},{i},{i}"));
    }
    let records = parse(&text).expect("parse");
    assert_eq!(records.len(), 10);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.id, format!("row-{}", index + 1));
    }
}

#[test]
fn short_rows_are_skipped_without_shifting_ids() {
    let text = format!("{HEADER}\n2024,EQ-1,Pump,1,2,3\n2024,EQ-2\n\n2024,EQ-4,Pump,1,2,3");
    let batch = CsvParser::new().parse_with_report(&text).expect("parse");
    let ids = batch
        .records
        .iter()
        .map(|record| record.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["row-1", "row-4"]);
    assert_eq!(batch.report.total_lines, 4);
    assert_eq!(batch.report.parsed_rows, 2);
    assert_eq!(batch.report.skipped_rows, 2);
}

#[test]
fn crlf_input_matches_lf_input() {
    let lf = format!("{HEADER}\n2024,EQ-1,Separator,10,350,85\n2024,EQ-2,Pump,1,2,3");
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(&lf).expect("lf"), parse(&crlf).expect("crlf"));
}

#[test]
fn unknown_columns_are_retained() {
    let text = format!("{HEADER},site\n2024,EQ-1,Boiler,1,2,3,north");
    let records = parse(&text).expect("parse");
    assert_eq!(records[0].extra.get("site").map(String::as_str), Some("north"));
    assert_eq!(
        records[0].equipment_type,
        EquipmentType::Other("Boiler".to_string())
    );
}

#[test]
fn extra_trailing_fields_are_ignored() {
    let text = format!("{HEADER}\n2024,EQ-1,Pump,1,2,3,surplus");
    let records = parse(&text).expect("parse");
    assert_eq!(records.len(), 1);
    assert!(records[0].extra.is_empty());
}

#[test]
fn header_only_input_yields_no_records() {
    let records = parse(HEADER).expect("parse");
    assert!(records.is_empty());
}

#[test]
fn blank_input_is_a_parse_error() {
    let err = parse("  \n \r\n").expect_err("empty");
    assert!(matches!(err, ParseError::EmptyInput));
}
