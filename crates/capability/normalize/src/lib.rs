//! CSV 文本 -> EquipmentRecord 批次的规范化解析。
//!
//! 约定：首行为表头（去空白、转小写）；按单一逗号分隔，不支持引号转义；
//! 列数少于表头的行直接跳过；数值列解析失败置零并记录在 `coerced` 中。

use domain::{
    EquipmentRecord, EquipmentStatus, EquipmentType, NumericField, StatusThresholds,
};
use std::collections::BTreeMap;
use tracing::debug;

const FIELD_DELIMITER: char = ',';

/// 解析错误。
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty input: missing header line")]
    EmptyInput,
}

/// 单次解析的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// 表头之后的行数（含被跳过的行）。
    pub total_lines: usize,
    pub parsed_rows: usize,
    pub skipped_rows: usize,
}

/// 解析结果：记录批次与统计。
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub records: Vec<EquipmentRecord>,
    pub report: ParseReport,
}

/// CSV 解析器。
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    thresholds: StatusThresholds,
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义状态阈值。
    pub fn with_thresholds(thresholds: StatusThresholds) -> Self {
        Self { thresholds }
    }

    pub fn parse(&self, text: &str) -> Result<Vec<EquipmentRecord>, ParseError> {
        self.parse_with_report(text).map(|batch| batch.records)
    }

    pub fn parse_with_report(&self, text: &str) -> Result<ParsedBatch, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let mut lines = text.split('\n');
        let header_line = lines.next().ok_or(ParseError::EmptyInput)?;
        let headers = header_line
            .split(FIELD_DELIMITER)
            .map(|name| name.trim().to_lowercase())
            .collect::<Vec<_>>();

        let mut records = Vec::new();
        let mut report = ParseReport::default();
        for (index, line) in lines.enumerate() {
            report.total_lines += 1;
            let fields = line.split(FIELD_DELIMITER).collect::<Vec<_>>();
            if fields.len() < headers.len() {
                report.skipped_rows += 1;
                continue;
            }
            records.push(self.build_record(index + 1, &headers, &fields));
        }
        report.parsed_rows = records.len();

        debug!(
            total_lines = report.total_lines,
            parsed_rows = report.parsed_rows,
            skipped_rows = report.skipped_rows,
            "csv parsed"
        );
        chemviz_telemetry::record_rows_parsed(report.parsed_rows as u64);
        chemviz_telemetry::record_rows_skipped(report.skipped_rows as u64);

        Ok(ParsedBatch { records, report })
    }

    fn build_record(
        &self,
        line_number: usize,
        headers: &[String],
        fields: &[&str],
    ) -> EquipmentRecord {
        let mut timestamp = String::new();
        let mut equipment_id = String::new();
        let mut type_label = String::new();
        let mut flowrate = None;
        let mut pressure = None;
        let mut temperature = None;
        let mut extra = BTreeMap::new();

        for (header, raw) in headers.iter().zip(fields.iter()) {
            let value = raw.trim();
            match header.as_str() {
                "timestamp" => timestamp = value.to_string(),
                "equipment_id" => equipment_id = value.to_string(),
                "type" => type_label = value.to_string(),
                "flowrate" => flowrate = parse_numeric(value),
                "pressure" => pressure = parse_numeric(value),
                "temperature" => temperature = parse_numeric(value),
                // 保留字段由解析器生成，源列不得覆盖。
                "" | "id" | "status" | "coerced" => {}
                other => {
                    extra.insert(other.to_string(), value.to_string());
                }
            }
        }

        let mut coerced = Vec::new();
        let mut resolve = |field: NumericField, value: Option<f64>| match value {
            Some(value) => value,
            None => {
                coerced.push(field);
                0.0
            }
        };
        let flowrate = resolve(NumericField::Flowrate, flowrate);
        let pressure = resolve(NumericField::Pressure, pressure);
        let temperature = resolve(NumericField::Temperature, temperature);

        EquipmentRecord {
            id: format!("row-{line_number}"),
            timestamp,
            equipment_id,
            equipment_type: EquipmentType::from_label(&type_label),
            flowrate,
            pressure,
            temperature,
            status: EquipmentStatus::classify_with(&self.thresholds, temperature, pressure),
            coerced,
            extra,
        }
    }
}

/// 使用默认阈值解析 CSV 文本。
pub fn parse(text: &str) -> Result<Vec<EquipmentRecord>, ParseError> {
    CsvParser::new().parse(text)
}

/// 读取最长的数值前缀（`"105C"` → 105），没有数值前缀时返回 `None`。
fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = numeric_prefix_len(value.as_bytes());
    if end == 0 {
        return None;
    }
    value[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 十进制浮点前缀长度：可选符号、数字、小数点与指数。
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };

    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(pos);
    let mut has_digits = int_end > pos;
    pos = int_end;
    if bytes.get(pos) == Some(&b'.') {
        let frac_end = digits_from(pos + 1);
        if has_digits || frac_end > pos + 1 {
            has_digits = true;
            pos = frac_end;
        }
    }
    if !has_digits {
        return 0;
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            pos = exp_end;
        }
    }
    pos
}
