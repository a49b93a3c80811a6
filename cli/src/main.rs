// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

//! # Sentinel supervisor daemon
//!
//! `sentineld` serves the agent-config HTTP API and runs the periodic
//! reconciliation loop that keeps the managed agent container aligned with
//! the persisted configuration.

use anyhow::{Context, Result};
use clap::Parser;
use sentinel_core::application::config_guard::ConfigConsistencyGuard;
use sentinel_core::application::config_service::AgentConfigService;
use sentinel_core::application::reconciler::AgentReconciler;
use sentinel_core::domain::container::ContainerOracle;
use sentinel_core::domain::event::AnalyticsSink;
use sentinel_core::domain::repository::ConfigStore;
use sentinel_core::domain::runtime::{AgentRuntime, AGENT_IMAGE};
use sentinel_core::domain::user::UserDirectory;
use sentinel_core::infrastructure::agent_runtime::DockerAgentRuntime;
use sentinel_core::infrastructure::analytics::{HttpAnalyticsSink, NoopAnalyticsSink};
use sentinel_core::infrastructure::container_oracle::DockerContainerOracle;
use sentinel_core::infrastructure::docker::DockerClient;
use sentinel_core::infrastructure::repositories::FileConfigStore;
use sentinel_core::infrastructure::user_directory::HttpUserDirectory;
use sentinel_core::presentation;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Sentinel supervisor - keep the monitoring agent aligned with its config
#[derive(Parser)]
#[command(name = "sentineld")]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTTP API host
    #[arg(long, env = "SENTINEL_HOST", default_value = "127.0.0.1")]
    host: String,

    /// HTTP API port
    #[arg(long, env = "SENTINEL_PORT", default_value = "8470")]
    port: u16,

    /// Path of the persisted agent config document
    #[arg(
        long,
        env = "SENTINEL_CONFIG_PATH",
        default_value = "/data/backend/config.json",
        value_name = "FILE"
    )]
    config_path: PathBuf,

    /// Image of the managed agent container
    #[arg(long, env = "SENTINEL_AGENT_IMAGE", default_value = AGENT_IMAGE)]
    agent_image: String,

    /// Base URL of the Sentinel API used for credential checks
    #[arg(
        long,
        env = "SENTINEL_API_BASE_URL",
        default_value = "https://api.sentinel.dev"
    )]
    api_base_url: String,

    /// Analytics collector endpoint; analytics are disabled when unset
    #[arg(long, env = "SENTINEL_ANALYTICS_URL")]
    analytics_url: Option<String>,

    /// Seconds between periodic reconciliation passes
    #[arg(long, env = "SENTINEL_RECONCILE_INTERVAL", default_value = "30")]
    reconcile_interval: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SENTINEL_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let docker = Arc::new(
        DockerClient::connect()
            .await
            .context("failed to connect to the docker daemon")?,
    );

    let store: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::new(&cli.config_path));
    let oracle: Arc<dyn ContainerOracle> = Arc::new(DockerContainerOracle::new(docker.clone()));
    let runtime: Arc<dyn AgentRuntime> =
        Arc::new(DockerAgentRuntime::new(docker, cli.agent_image.clone()));

    let http = reqwest::Client::new();
    let users: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(
        http.clone(),
        cli.api_base_url.clone(),
    ));
    let analytics: Arc<dyn AnalyticsSink> = match &cli.analytics_url {
        Some(url) => Arc::new(HttpAnalyticsSink::new(http, url.clone())),
        None => Arc::new(NoopAnalyticsSink),
    };

    let reconciler = Arc::new(AgentReconciler::new(store.clone(), runtime.clone()));
    let guard = Arc::new(ConfigConsistencyGuard::new(
        store.clone(),
        oracle.clone(),
        analytics,
    ));
    let service = Arc::new(AgentConfigService::new(
        store,
        oracle,
        users,
        runtime,
        guard,
        reconciler.clone(),
    ));

    spawn_reconcile_loop(reconciler, Duration::from_secs(cli.reconcile_interval));

    let app = presentation::api::app(service).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cli.host, cli.port))?;
    info!(host = %cli.host, port = cli.port, "listening");

    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}

/// Periodic reconciliation. The first tick fires immediately so the managed
/// container converges on startup; the reconciler's own single-flight guard
/// serializes these passes against API-triggered ones.
fn spawn_reconcile_loop(reconciler: Arc<AgentReconciler>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(err) = reconciler.reconcile().await {
                warn!(error = %err, "reconciliation pass failed");
            }
        }
    });
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
