//! 演示用的样例 CSV 生成。

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use domain::thresholds::{
    SAMPLE_CATEGORIES, SAMPLE_EQUIPMENT_ID_BASE, SAMPLE_FLOWRATE_RANGE, SAMPLE_INTERVAL_SECONDS,
    SAMPLE_PRESSURE_RANGE, SAMPLE_ROWS, SAMPLE_TEMPERATURE_RANGE,
};
use rand::Rng;

/// 样例数据表头，与解析器识别的列一致。
pub const SAMPLE_HEADER: &str = "timestamp,equipment_id,type,flowrate,pressure,temperature";

/// 生成默认行数的随机样例 CSV。
pub fn generate_sample_text() -> String {
    generate_sample_rows(SAMPLE_ROWS)
}

/// 生成指定行数的随机样例 CSV。
pub fn generate_sample_rows(rows: usize) -> String {
    generate_sample_text_with(&mut rand::rng(), Utc::now(), rows)
}

/// 以给定随机源与起始时间生成样例；第 i 行时间为 `now - i * 间隔`。
pub fn generate_sample_text_with<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let mut lines = Vec::with_capacity(rows + 1);
    lines.push(SAMPLE_HEADER.to_string());
    for i in 0..rows {
        let category = SAMPLE_CATEGORIES[rng.random_range(0..SAMPLE_CATEGORIES.len())];
        let flowrate = rng.random_range(SAMPLE_FLOWRATE_RANGE.0..SAMPLE_FLOWRATE_RANGE.1);
        let pressure = rng.random_range(SAMPLE_PRESSURE_RANGE.0..SAMPLE_PRESSURE_RANGE.1);
        let temperature =
            rng.random_range(SAMPLE_TEMPERATURE_RANGE.0..SAMPLE_TEMPERATURE_RANGE.1);
        let offset = TimeDelta::seconds(SAMPLE_INTERVAL_SECONDS.saturating_mul(i as i64));
        let timestamp = (now - offset).to_rfc3339_opts(SecondsFormat::Millis, true);
        lines.push(format!(
            "{timestamp},EQ-{},{category},{flowrate:.2},{pressure:.2},{temperature:.2}",
            SAMPLE_EQUIPMENT_ID_BASE + i
        ));
    }
    lines.join("\n")
}
