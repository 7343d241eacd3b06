//! acomo MCP server over stdio.

use acomo_mcp::server::AcomoMcpServer;
use acomo_openapi_tools::store::SpecStore;
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt as _;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Expose the acomo API (via its `OpenAPI` document) as MCP tools over stdio.
///
/// API access is configured through `ACOMO_*` environment variables, read on every call.
#[derive(Debug, Parser)]
#[command(name = "acomo-mcp", version)]
struct Args {
    /// Default log level (overridden by `RUST_LOG`).
    #[arg(long, env = "ACOMO_MCP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format. Logs always go to stderr.
    #[arg(long, env = "ACOMO_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let shutdown = CancellationToken::new();
    let server = AcomoMcpServer::new(Arc::new(SpecStore::from_env())).with_shutdown(shutdown.clone());

    tracing::info!("acomo-mcp {} starting on stdio", env!("CARGO_PKG_VERSION"));
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!("serving error: {e:?}"))?;

    tokio::select! {
        res = service.waiting() => {
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, aborting in-flight calls");
            shutdown.cancel();
        }
    }

    Ok(())
}
