//! 命令行定义
//!
//! 除 `login` 与 `sample` 外，所有命令都要求已登录。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 化工设备遥测数据分析命令行。
#[derive(Debug, Parser)]
#[command(name = "chemviz", version, about = "Chemical equipment telemetry analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the session store file (defaults to CHEMVIZ_STORE_PATH)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in with a username and password.
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Upload and analyze a CSV file.
    Upload {
        path: PathBuf,
        /// Skip the insight request.
        #[arg(long)]
        no_insights: bool,
    },
    /// Generate and analyze a demo batch.
    Demo {
        #[arg(long)]
        no_insights: bool,
    },
    /// Show the current session.
    Dashboard,
    /// List previous uploads, newest first.
    History,
    /// Load a previous upload into the current session.
    View { id: String },
    /// Build the printable report for the current session.
    Report,
    /// Clear the current session (history is kept).
    Clear,
    /// Print generated sample CSV.
    Sample {
        /// Number of rows (defaults to CHEMVIZ_SAMPLE_ROWS)
        #[arg(long)]
        rows: Option<usize>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Upload { .. } => "upload",
            Self::Demo { .. } => "demo",
            Self::Dashboard => "dashboard",
            Self::History => "history",
            Self::View { .. } => "view",
            Self::Report => "report",
            Self::Clear => "clear",
            Self::Sample { .. } => "sample",
        }
    }

    /// 是否需要先通过登录门禁。
    pub fn requires_sign_in(&self) -> bool {
        !matches!(self, Self::Login { .. } | Self::Sample { .. })
    }
}
