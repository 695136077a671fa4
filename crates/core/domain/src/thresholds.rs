//! 启发式常量：状态阈值、离群围栏、质量评分、历史上限与样例数据参数。
//!
//! 所有算法只通过这里的命名常量（或以其为默认值的配置结构）取值，
//! 便于独立调整与测试。

/// 温度高于该值判定为 Critical。
pub const CRITICAL_TEMPERATURE: f64 = 100.0;
/// 压力高于该值判定为 Critical。
pub const CRITICAL_PRESSURE: f64 = 500.0;
/// 温度高于该值判定为 Warning。
pub const WARNING_TEMPERATURE: f64 = 80.0;
/// 压力高于该值判定为 Warning。
pub const WARNING_PRESSURE: f64 = 300.0;

/// 四分位围栏系数（Tukey fence）。
pub const IQR_FENCE_FACTOR: f64 = 1.5;
/// 下四分位取值位置。
pub const LOWER_QUARTILE: f64 = 0.25;
/// 上四分位取值位置。
pub const UPPER_QUARTILE: f64 = 0.75;

/// 质量评分起始值（同时也是上限）。
pub const QUALITY_BASE: i64 = 100;
/// 每条缺失 equipment_id 或流量非数值的记录扣分。
pub const QUALITY_INCOMPLETE_PENALTY: i64 = 2;
/// 每个离群点扣分。
pub const QUALITY_OUTLIER_PENALTY: i64 = 1;

/// 历史列表最多保留的摘要条数。
pub const HISTORY_LIMIT: usize = 15;

/// 样例 CSV 默认行数。
pub const SAMPLE_ROWS: usize = 50;
/// 样例 CSV 设备类别。
pub const SAMPLE_CATEGORIES: [&str; 4] = ["Reactor", "Pump", "Heat Exchanger", "Separator"];
/// 样例流量区间 [min, max)。
pub const SAMPLE_FLOWRATE_RANGE: (f64, f64) = (50.0, 150.0);
/// 样例压力区间 [min, max)。
pub const SAMPLE_PRESSURE_RANGE: (f64, f64) = (100.0, 600.0);
/// 样例温度区间 [min, max)。
pub const SAMPLE_TEMPERATURE_RANGE: (f64, f64) = (20.0, 170.0);
/// 样例行之间的时间间隔（秒）。
pub const SAMPLE_INTERVAL_SECONDS: i64 = 3600;
/// 样例设备编号起点。
pub const SAMPLE_EQUIPMENT_ID_BASE: usize = 1000;
/// 演示数据使用的文件名。
pub const DEMO_FILE_NAME: &str = "demo_batch_001.csv";

/// 洞察尚未返回时的分类占位标签。
pub const PENDING_CLASSIFICATION: &str = "Pending AI Analysis";

/// 设备状态判定阈值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    pub critical_temperature: f64,
    pub critical_pressure: f64,
    pub warning_temperature: f64,
    pub warning_pressure: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            critical_temperature: CRITICAL_TEMPERATURE,
            critical_pressure: CRITICAL_PRESSURE,
            warning_temperature: WARNING_TEMPERATURE,
            warning_pressure: WARNING_PRESSURE,
        }
    }
}
