//! 命令输出与错误映射
//!
//! 所有输出统一为 `ApiResponse` 的 JSON（带缩进）：
//! - 成功：`success`
//! - 失败：`CommandFailure`，按错误类型映射稳定错误码
//!
//! | 错误 | 错误码 |
//! |---|---|
//! | 未登录 | `AUTH.REQUIRED` |
//! | 用户名/密码为空 | `AUTH.INVALID` |
//! | 读取文件失败 | `INGEST.READ` |
//! | CSV 无表头 | `PARSE.INVALID` |
//! | 无有效数据行 | `DATASET.EMPTY` |
//! | 归档批次缺失 | `ARCHIVE.MISSING` |
//! | 存储读写失败 | `STORAGE.ERROR` |
//! | 其他 | `INTERNAL.ERROR` |

use api_contract::ApiResponse;
use chemviz_auth::AuthError;
use chemviz_pipeline::PipelineError;
use serde::Serialize;

/// 命令执行结果：成功时为渲染好的输出文本。
pub type CommandResult = Result<String, CommandFailure>;

/// 命令失败（错误码 + 描述）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub code: &'static str,
    pub message: String,
}

impl CommandFailure {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 渲染为失败响应 JSON。
    pub fn render(&self) -> String {
        let response = ApiResponse::<()>::error(self.code, self.message.clone());
        serde_json::to_string_pretty(&response)
            .unwrap_or_else(|_| format!("{}: {}", self.code, self.message))
    }
}

/// 成功响应
pub fn success<T: Serialize>(data: T) -> CommandResult {
    serde_json::to_string_pretty(&ApiResponse::success(data))
        .map_err(|err| internal_error(err.to_string()))
}

/// 未登录
pub fn auth_required() -> CommandFailure {
    CommandFailure::new("AUTH.REQUIRED", "sign in first: chemviz login <username> -p <password>")
}

/// 内部错误
pub fn internal_error(message: impl Into<String>) -> CommandFailure {
    CommandFailure::new("INTERNAL.ERROR", message)
}

/// 登录错误映射
pub fn auth_failure(err: AuthError) -> CommandFailure {
    match err {
        AuthError::NotSignedIn => auth_required(),
        AuthError::MissingCredentials => CommandFailure::new("AUTH.INVALID", err.to_string()),
        AuthError::Storage(message) => CommandFailure::new("STORAGE.ERROR", message),
    }
}

/// 编排层错误映射
pub fn pipeline_failure(err: PipelineError) -> CommandFailure {
    let code = match &err {
        PipelineError::Ingest(_) => "INGEST.READ",
        PipelineError::Parse(_) => "PARSE.INVALID",
        PipelineError::Analysis(_) => "DATASET.EMPTY",
        PipelineError::ArchivedDataMissing { .. } => "ARCHIVE.MISSING",
        PipelineError::Storage(_) => "STORAGE.ERROR",
    };
    CommandFailure::new(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_renders_error_envelope() {
        let rendered = pipeline_failure(PipelineError::ArchivedDataMissing {
            id: "42".to_string(),
        })
        .render();
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(value["success"], false);
        assert!(value["data"].is_null());
        assert_eq!(value["error"]["code"], "ARCHIVE.MISSING");
        assert_eq!(
            value["error"]["message"],
            "archived data for 42 is no longer available"
        );
    }

    #[test]
    fn success_wraps_data() {
        let rendered = success(vec![1, 2]).expect("render");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert!(value["error"].is_null());
    }

    #[test]
    fn auth_errors_map_to_codes() {
        assert_eq!(auth_failure(AuthError::NotSignedIn).code, "AUTH.REQUIRED");
        assert_eq!(auth_failure(AuthError::MissingCredentials).code, "AUTH.INVALID");
    }
}
