//! eliza-chat CLI: chat with an ELIZA web service from the terminal

use chrono::Local;
use clap::{Parser, Subcommand};
use eliza_engine::{Config, ConfigError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Terminal client for the ELIZA chat service
#[derive(Parser)]
#[command(name = "eliza-chat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to <config dir>/eliza-chat/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the ELIZA service
    #[arg(long, global = true)]
    server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Don't save the session after each exchange
    #[arg(long, global = true)]
    no_persist: bool,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the full-screen chat (default when no command specified)
    Tui,

    /// Chat line by line on stdin/stdout
    Line,

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            init_tracing_or_exit(&config, cli.debug);
            run_async(|| async { eliza_tui::run_tui(&config).await });
        }
        Some(Commands::Line) => {
            init_tracing_or_exit(&config, cli.debug);
            run_async(|| async { eliza_tui::run_line_mode(&config).await });
        }
        Some(Commands::Config { json }) => {
            cmd_config(&config, json);
        }
    }
}

/// Defaults, then the config file, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server_url.clone_from(server);
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_seconds = timeout;
    }
    if cli.no_persist {
        config.persist_sessions = false;
    }
}

fn run_async<F, Fut>(f: F)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), Box<dyn std::error::Error>>>,
{
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(f()) {
        tracing::error!(error = %e, "Session ended with an error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing_or_exit(config: &Config, debug: bool) {
    let log_dir = config.resolved_log_dir();
    if let Err(e) = init_tracing(&log_dir, debug) {
        eprintln!("Failed to set up logging in {}: {e}", log_dir.display());
        std::process::exit(1);
    }
}

/// Log to a timestamped file; the terminal belongs to the chat.
fn init_tracing(log_dir: &Path, debug: bool) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_name = format!("{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let file_appender = rolling::never(log_dir, &file_name);

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .map_err(std::io::Error::other)?;

    tracing::debug!(path = %log_dir.join(&file_name).display(), "Tracing initialized");
    Ok(())
}

fn cmd_config(config: &Config, json: bool) {
    if json {
        match serde_json::to_string_pretty(config) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialize config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Effective configuration\n");
    println!("  Server:   {}", config.server_url);
    println!("  Timeout:  {}s", config.request_timeout_seconds);
    println!("  Greeting: {}", config.greeting);
    println!(
        "  Persist:  {}",
        if config.persist_sessions { "yes" } else { "no" }
    );
    println!("  Logs:     {}", config.resolved_log_dir().display());

    if let Some(path) = Config::default_path() {
        let note = if path.exists() { "" } else { " (not present)" };
        println!("\n  Config file: {}{note}", path.display());
    }
}
