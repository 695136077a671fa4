//! 输入源：本地 CSV 文件、内存文本与样例数据生成。

pub mod sample;

use async_trait::async_trait;
use domain::thresholds::{DEMO_FILE_NAME, SAMPLE_ROWS};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use sample::{
    SAMPLE_HEADER, generate_sample_rows, generate_sample_text, generate_sample_text_with,
};

/// 读取输入源错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("read {path} failed: {message}")]
    Read { path: String, message: String },
    #[error("{0} is not valid UTF-8 text")]
    InvalidEncoding(String),
}

/// 一次上传的原始文本及其来源文件名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPayload {
    pub file_name: String,
    pub text: String,
}

/// CSV 输入源抽象（读取文件内容是可挂起的操作）。
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn read(&self) -> Result<CsvPayload, IngestError>;
}

/// 本地文件源。
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[async_trait]
impl CsvSource for FileSource {
    async fn read(&self) -> Result<CsvPayload, IngestError> {
        let path = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| IngestError::Read {
                path: path.clone(),
                message: err.to_string(),
            })?;
        let text = String::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding(path))?;
        debug!(path = %self.path.display(), bytes = text.len(), "csv file read");
        Ok(CsvPayload {
            file_name: self.file_name(),
            text,
        })
    }
}

/// 样例数据源（演示模式）。
#[derive(Debug, Clone)]
pub struct SampleSource {
    rows: usize,
}

impl SampleSource {
    pub fn new(rows: usize) -> Self {
        Self { rows }
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new(SAMPLE_ROWS)
    }
}

#[async_trait]
impl CsvSource for SampleSource {
    async fn read(&self) -> Result<CsvPayload, IngestError> {
        Ok(CsvPayload {
            file_name: DEMO_FILE_NAME.to_string(),
            text: generate_sample_rows(self.rows),
        })
    }
}

/// 内存文本源（用于接线与测试）。
#[derive(Debug, Clone)]
pub struct TextSource {
    payload: CsvPayload,
}

impl TextSource {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            payload: CsvPayload {
                file_name: file_name.into(),
                text: text.into(),
            },
        }
    }
}

#[async_trait]
impl CsvSource for TextSource {
    async fn read(&self) -> Result<CsvPayload, IngestError> {
        Ok(self.payload.clone())
    }
}
