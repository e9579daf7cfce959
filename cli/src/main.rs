//! CLI entrypoint for workpad
//!
//! This is the main binary that wires together all layers using
//! dependency injection: in-memory store + broadcast hub behind the
//! façade, served over HTTP+SSE.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use workpad_application::ports::audit::AuditSink;
use workpad_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditSink, TracingAuditSink, in_memory_scratchpad,
};
use workpad_server::router;

#[derive(Parser)]
#[command(name = "workpad", about = "Shared scratchpad service for multi-agent research runs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Explicit config file path (highest priority)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip config discovery and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Override the bind address from config
    #[arg(long)]
    bind: Option<String>,

    /// Write logs to daily-rolling files in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn,workpad=info"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // The appender guard must outlive the server or buffered lines are lost.
    let _log_guard = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "workpad.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    // === Dependency Injection ===
    let audit: Arc<dyn AuditSink> = match &config.server.audit_log {
        Some(path) => match JsonlAuditSink::new(path) {
            Some(sink) => {
                info!(path = %path, "audit records go to JSONL file");
                Arc::new(sink)
            }
            None => Arc::new(TracingAuditSink),
        },
        None => Arc::new(TracingAuditSink),
    };

    let scratchpad = Arc::new(in_memory_scratchpad(&config, audit));
    let app = router(scratchpad);

    let bind_addr = cli.bind.unwrap_or_else(|| config.server.bind_addr.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("workpad listening on http://{bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
