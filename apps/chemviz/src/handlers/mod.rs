//! Handlers 模块

pub mod datasets;
pub mod session;

pub use datasets::*;
pub use session::*;

use crate::AppState;
use crate::cli::Commands;
use crate::middleware::require_user;
use crate::utils::response::CommandResult;
use tracing::{Instrument, info_span};

/// 执行一条命令；需要登录的命令先经过门禁。
pub async fn dispatch(state: &AppState, command: Commands) -> CommandResult {
    let span = info_span!("command", command = command.name());
    async move {
        if command.requires_sign_in() {
            require_user(state).await?;
        }
        match command {
            Commands::Login { username, password } => login(state, &username, &password).await,
            Commands::Logout => logout(state).await,
            Commands::Whoami => whoami(state).await,
            Commands::Upload { path, no_insights } => upload(state, path, no_insights).await,
            Commands::Demo { no_insights } => demo(state, no_insights).await,
            Commands::Dashboard => dashboard(state).await,
            Commands::History => history(state).await,
            Commands::View { id } => view(state, &id).await,
            Commands::Report => report(state).await,
            Commands::Clear => clear(state).await,
            Commands::Sample { rows } => sample(state, rows),
        }
    }
    .instrument(span)
    .await
}
