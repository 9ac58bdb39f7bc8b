//! The `etrap-agent` binary: loads configuration, wires an
//! [`etrap_context::AgentContext`] to the real Redis/S3/EVM transports,
//! and runs the orchestrator until asked to shut down (§6).

mod orchestrator;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "etrap-agent", about = "Change-data-capture ingestion and anchoring agent", version)]
struct Cli {
    /// Path to the agent's TOML configuration file.
    #[arg(long, env = "ETRAP_CONFIG", default_value = "./config/etrap-agent.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match etrap_config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, path = %cli.config.display(), "failed to load configuration");
            std::process::exit(1);
        }
    };

    let ctx = match etrap_context::AgentContext::connect(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect agent context");
            std::process::exit(1);
        }
    };

    let orchestrator_task = orchestrator::run(&ctx);
    tokio::pin!(orchestrator_task);

    tokio::select! {
        result = &mut orchestrator_task => {
            result?;
        }
        _ = wait_for_shutdown_signal() => {
            tracing::info!("shutdown signal received");
            ctx.trigger_shutdown();
            orchestrator_task.await?;
        }
    }

    tracing::info!("etrap-agent stopped");
    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM — whichever arrives first.
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
