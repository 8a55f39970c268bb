use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ghost_router::config::ServerConfig;
use ghost_router::logging::{init_logging, LogConfig, LogFormat};
use ghost_router::sample::build_router;
use ghost_router::server::HttpServer;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ghost-router")]
#[command(version, about = "Serve the sample user-lookup pipeline", long_about = None)]
struct Cli {
    /// Address to bind (overrides GHOST_ADDR)
    #[arg(long)]
    addr: Option<String>,

    /// Secret handed to the user route through its extender
    #[arg(long, env = "GHOST_SECRET", default_value = "s3cr3tstr!ng")]
    secret: String,

    /// trace, debug, info, warn or error (overrides GHOST_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// json or pretty (overrides GHOST_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        log_config.log_level = level;
    }
    if let Some(format) = cli.log_format.as_deref() {
        log_config.format = LogFormat::parse(format);
    }
    init_logging(&log_config)?;

    let mut config = ServerConfig::from_env();
    if let Some(addr) = cli.addr {
        config.addr = addr;
    }
    config.apply();

    let router = build_router(&cli.secret)?;
    let handle = HttpServer(router.into_service())
        .start(config.addr.as_str())
        .with_context(|| format!("failed to start server on {}", config.addr))?;
    info!(addr = %handle.local_addr(), stack_size = config.stack_size, "ghost-router started");

    handle
        .join()
        .map_err(|_| anyhow!("server coroutine panicked"))
}
