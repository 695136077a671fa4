//! 登录相关 handlers：登录、登出、当前用户

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{CommandResult, auth_failure, success};
use api_contract::SessionDto;

/// 登录：用户名与密码均不能为空，密码不做校验
pub async fn login(state: &AppState, username: &str, password: &str) -> CommandResult {
    let user = state
        .auth
        .sign_in(username, password)
        .await
        .map_err(auth_failure)?;
    success(SessionDto::from_username(Some(user.username)))
}

/// 登出
pub async fn logout(state: &AppState) -> CommandResult {
    state.auth.sign_out().await.map_err(auth_failure)?;
    success(SessionDto::from_username(None))
}

/// 当前用户
pub async fn whoami(state: &AppState) -> CommandResult {
    let user = require_user(state).await?;
    success(SessionDto::from_username(Some(user.username)))
}
