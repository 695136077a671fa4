//! 登录门禁
//!
//! 数据类命令执行前校验存储中的登录标记；登录状态不是安全边界。

use crate::AppState;
use crate::utils::response::{CommandFailure, auth_failure};
use chemviz_auth::SignedInUser;
use tracing::debug;

/// 要求已登录，返回当前用户
pub async fn require_user(state: &AppState) -> Result<SignedInUser, CommandFailure> {
    let user = state.auth.require_user().await.map_err(auth_failure)?;
    debug!(username = %user.username, "gate passed");
    Ok(user)
}
