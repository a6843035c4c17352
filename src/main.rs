//! BotEmail MCP server - stdio entry point.
//!
//! Reads JSON-RPC requests from stdin, writes replies to stdout, logs to
//! stderr. Exits on stdin EOF or Ctrl-C.

use std::time::Duration;

use clap::Parser;

use botemail_mcp::mcp::McpServer;
use botemail_mcp::{Config, Gateway};

/// How long runtime shutdown waits for leftover tasks. The stdin reader
/// blocks on a thread that cannot be interrupted, so this must stay finite.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Command-line flags. Each one overrides the matching `BOTEMAIL_*` variable.
#[derive(Debug, Parser)]
#[command(name = "botemail-mcp", version, about = "MCP server for BotEmail.ai bot email accounts")]
struct Args {
    /// BotEmail service base address [env: BOTEMAIL_API].
    #[arg(long)]
    api_base: Option<String>,

    /// Default API key used when a tool call omits `apiKey` [env: BOTEMAIL_API_KEY].
    #[arg(long)]
    api_key: Option<String>,

    /// Outbound request timeout in seconds [env: BOTEMAIL_TIMEOUT_SECS].
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON [env: BOTEMAIL_LOG_FORMAT=json].
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// Environment first, then flags on top, then validation.
    fn into_config<F>(self, lookup: F) -> botemail_mcp::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::read_lookup(lookup)?;
        if let Some(base) = self.api_base.filter(|v| !v.trim().is_empty()) {
            config.remote.base_url = base;
        }
        if let Some(key) = self.api_key.filter(|v| !v.trim().is_empty()) {
            config.remote.default_api_key = Some(key);
        }
        if let Some(secs) = self.timeout_secs {
            config.remote.timeout = Duration::from_secs(secs);
        }
        if self.log_json {
            config.observability.json_logs = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Args::parse().into_config(|key| std::env::var(key).ok())?;

    // Initialize observability
    botemail_mcp::observability::init_tracing(&config.observability);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(run(config));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    outcome
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Gateway::new(&config.remote).map_err(|e| {
        tracing::error!("Failed to build gateway: {}", e);
        e
    })?;
    let server = McpServer::new(gateway, config.server.clone());

    let cancel = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            cancel.cancel();
        }
    });

    tracing::info!(
        base_url = %config.remote.base_url,
        default_api_key = config.remote.default_api_key.is_some(),
        "BotEmail MCP server running on stdio"
    );

    if let Err(e) = server.serve_stdio().await {
        tracing::error!("MCP server failed: {}", e);
        return Err(e.into());
    }

    tracing::info!("MCP server stopped");
    Ok(())
}
