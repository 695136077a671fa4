//! 应用运行配置加载。

use domain::thresholds::{HISTORY_LIMIT, SAMPLE_ROWS};
use std::env;
use std::path::PathBuf;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub store_quota_bytes: Option<u64>,
    pub history_limit: usize,
    pub sample_rows: usize,
    pub insight_delay_ms: u64,
    pub insights_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".chemviz/store.json"),
            store_quota_bytes: None,
            history_limit: HISTORY_LIMIT,
            sample_rows: SAMPLE_ROWS,
            insight_delay_ms: 1500,
            insights_enabled: true,
        }
    }
}

impl AppConfig {
    /// 从环境变量读取配置，未设置的项取默认值。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let store_path = env::var("CHEMVIZ_STORE_PATH")
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);
        let store_quota_bytes =
            read_optional_u64("CHEMVIZ_STORE_QUOTA_BYTES")?.filter(|value| *value > 0);
        let history_limit =
            read_usize_with_default("CHEMVIZ_HISTORY_LIMIT", defaults.history_limit)?;
        if history_limit == 0 {
            return Err(ConfigError::Invalid(
                "CHEMVIZ_HISTORY_LIMIT".to_string(),
                "0".to_string(),
            ));
        }
        let sample_rows = read_usize_with_default("CHEMVIZ_SAMPLE_ROWS", defaults.sample_rows)?;
        let insight_delay_ms =
            read_u64_with_default("CHEMVIZ_INSIGHT_DELAY_MS", defaults.insight_delay_ms)?;
        let insights_enabled =
            read_bool_with_default("CHEMVIZ_INSIGHTS", defaults.insights_enabled)?;

        Ok(Self {
            store_path,
            store_quota_bytes,
            history_limit,
            sample_rows,
            insight_delay_ms,
            insights_enabled,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

fn read_bool_with_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
