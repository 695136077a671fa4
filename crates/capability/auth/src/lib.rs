//! 登录门禁能力：登录、登出与当前用户查询。
//!
//! 登录状态只是存储中的一个用户标记，不承担安全边界；
//! 密码只校验非空，不做比对。

use async_trait::async_trait;
use chemviz_storage::KeyValueStore;
use chemviz_storage::keys::USER_SESSION;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 登录相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("not signed in")]
    NotSignedIn,
    #[error("storage error: {0}")]
    Storage(String),
}

/// 持久化的登录用户。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    pub username: String,
    pub is_authenticated: bool,
}

/// 登录服务实现（基于 KeyValueStore）。
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    /// 创建登录服务实例。
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 登录：用户名与密码均不能为空（去除首尾空白后判断）。
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignedInUser, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let user = SignedInUser {
            username: username.to_string(),
            is_authenticated: true,
        };
        let raw = serde_json::to_string(&user).map_err(|err| AuthError::Storage(err.to_string()))?;
        self.store
            .set(USER_SESSION, raw)
            .await
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        info!(username = %user.username, "signed in");
        Ok(user)
    }

    /// 登出，返回之前是否处于登录状态。
    pub async fn sign_out(&self) -> Result<bool, AuthError> {
        let removed = self
            .store
            .remove(USER_SESSION)
            .await
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        if removed {
            info!("signed out");
        }
        Ok(removed)
    }

    /// 当前登录用户；无记录、记录损坏或未认证均视为未登录。
    pub async fn current_user(&self) -> Result<Option<SignedInUser>, AuthError> {
        let raw = self
            .store
            .get(USER_SESSION)
            .await
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        Ok(raw
            .and_then(|raw| serde_json::from_str::<SignedInUser>(&raw).ok())
            .filter(|user| user.is_authenticated && !user.username.is_empty()))
    }

    /// 要求已登录，否则返回 `NotSignedIn`。
    pub async fn require_user(&self) -> Result<SignedInUser, AuthError> {
        self.current_user().await?.ok_or(AuthError::NotSignedIn)
    }
}

/// 登录能力 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignedInUser, AuthError>;
    async fn sign_out(&self) -> Result<bool, AuthError>;
    async fn current_user(&self) -> Result<Option<SignedInUser>, AuthError>;
    async fn require_user(&self) -> Result<SignedInUser, AuthError>;
}

#[async_trait]
impl Authenticator for AuthService {
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignedInUser, AuthError> {
        self.sign_in(username, password).await
    }

    async fn sign_out(&self) -> Result<bool, AuthError> {
        self.sign_out().await
    }

    async fn current_user(&self) -> Result<Option<SignedInUser>, AuthError> {
        self.current_user().await
    }

    async fn require_user(&self) -> Result<SignedInUser, AuthError> {
        self.require_user().await
    }
}
