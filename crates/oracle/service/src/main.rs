//! Oracle daemon
//!
//! Serves the bridge simulation HTTP trigger and runs the compliance sync
//! on its cron schedule.

use anyhow::Context;
use clap::Parser;
use oracle_service::config::ServiceConfig;
use oracle_service::scheduler::CronTrigger;
use oracle_service::{build_router, ServiceState};
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "oracled", version, about = "Consensus-gated oracle workflows")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ORACLE_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides `server.listen_addr`
    #[arg(short, long, env = "ORACLE_LISTEN_ADDR")]
    listen: Option<SocketAddr>,

    /// Log level, overrides `logging.level`
    #[arg(long, env = "ORACLE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "ORACLE_LOG_JSON")]
    json: bool,

    /// Serve the HTTP trigger only
    #[arg(long, default_value_t = false)]
    no_cron: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if cli.no_cron {
        config.server.cron_enabled = false;
    }

    init_tracing(&config);

    let cron = CronTrigger::parse(&config.workflow.compliance.schedule)?;
    let state = ServiceState::bootstrap(config.workflow.clone())?;
    tracing::info!(
        nodes = state.runtime.node_count(),
        quorum = state.runtime.quorum(),
        chains = ?state.config.chains.supported(),
        "Oracle network ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cron_task = if config.server.cron_enabled {
        Some(tokio::spawn(cron.run(state.compliance.clone(), shutdown_rx)))
    } else {
        tracing::info!("Cron trigger disabled");
        None
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.server.listen_addr).await?;
    tracing::info!("oracle-service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("oracle-service shutting down");
    let _ = shutdown_tx.send(true);
    if let Some(task) = cron_task {
        task.await?;
    }
    Ok(())
}

fn init_tracing(config: &ServiceConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
