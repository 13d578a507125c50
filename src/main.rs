use anyhow::{Context, Result};
use clap::Parser;
use contact_cli::api_client::ApiClient;
use contact_cli::app::DirectoryApp;
use contact_cli::config::Config;
use contact_cli::state::CommandDispatcher;
use contact_cli::utils::{dual_logging, logging};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Search the contact directory and send bulk messages to selected contacts
#[derive(Debug, Parser)]
#[command(name = "contact-cli", version, about)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, env = "CONTACT_CLI_SERVER")]
    server: Option<String>,

    /// Path to config.toml (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debounce delay for the search box in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Print a commented default config and exit
    #[arg(long)]
    generate_config: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.search.debounce_ms = debounce_ms;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", Config::create_default_with_comments());
        return Ok(());
    }

    let log_buffer = logging::init_tracing_with_dual_logging();
    if let Some(logger) = dual_logging::get_dual_logger() {
        eprintln!("Debug logs will be written to:");
        eprintln!("   {}", logger.log_path().display());
        eprintln!("   Tail with: tail -f {}", logger.log_path().display());
    }

    let config = load_config(&cli)?;
    tracing::info!(target: "system", "Using backend {}", config.server.base_url);

    let client = ApiClient::new(
        &config.server.base_url,
        config.server.connect_timeout(),
        config.server.request_timeout(),
    )
    .context("building HTTP client")?;

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let (events_tx, mut events_rx) = CommandDispatcher::channel();
    let dispatcher = CommandDispatcher::new(Arc::new(client), runtime.handle().clone(), events_tx);

    let mut app = DirectoryApp::new(&config).with_log_buffer(log_buffer);
    let result = contact_cli::tui::run_tui(&mut app, &dispatcher, &mut events_rx);

    // Requests still in flight are abandoned on exit
    runtime.shutdown_timeout(Duration::from_millis(500));

    result.context("terminal UI failed")
}
