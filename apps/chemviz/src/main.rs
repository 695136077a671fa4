//! ChemViz 命令行：上传 CSV、查看统计摘要、历史与报告。

mod cli;
mod handlers;
mod middleware;
mod utils;

use chemviz_auth::AuthService;
use chemviz_config::AppConfig;
use chemviz_insight::{InsightProvider, MockInsightProvider};
use chemviz_pipeline::{Pipeline, PipelineConfig};
use chemviz_storage::{FileKeyValueStore, KeyValueStore, SessionStore};
use chemviz_telemetry::init_tracing;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub auth: Arc<AuthService>,
    pub config: AppConfig,
}

impl AppState {
    /// 基于同一键值存储组装会话服务、编排层与登录门禁。
    pub fn new(store: Arc<dyn KeyValueStore>, config: AppConfig) -> Self {
        let session = SessionStore::with_history_limit(store.clone(), config.history_limit);
        let insight: Arc<dyn InsightProvider> = Arc::new(MockInsightProvider::new(
            Duration::from_millis(config.insight_delay_ms),
        ));
        let pipeline = Pipeline::with_config(
            session,
            insight,
            PipelineConfig {
                sample_rows: config.sample_rows,
                ..PipelineConfig::default()
            },
        );
        let auth = Arc::new(AuthService::new(store));
        Self {
            pipeline,
            auth,
            config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    // 从环境变量加载运行配置，命令行参数优先
    let mut config = AppConfig::from_env()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    // 初始化结构化日志（输出到 stderr，stdout 只保留 JSON）
    init_tracing();

    let store = FileKeyValueStore::open_with_quota(&config.store_path, config.store_quota_bytes)
        .await?;
    debug!(path = %store.path().display(), "session store opened");
    let state = AppState::new(Arc::new(store), config);

    match handlers::dispatch(&state, cli.command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(failure) => {
            println!("{}", failure.render());
            std::process::exit(1);
        }
    }
}
