//! Hamburgueria CLI - sign in and out of Hamburgueria from the terminal.
//!
//! The session is stored the same way the web front-end stores it, so a
//! login here survives restarts until `hamburgueria logout`.

mod commands;
mod toast;

use std::io;

use anyhow::Result;
use hamburgueria_core::Config;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory for an optional rolling log file
const ENV_LOG_DIR: &str = "HAMBURGUERIA_LOG_DIR";

const USAGE: &str = "\
Usage: hamburgueria <command>

Commands:
  login [email]   Sign in and remember the session
  logout          Forget the current session
  whoami          Show the signed-in user
  help            Show this message";

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "hamburgueria.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");

    if matches!(command, "help" | "--help" | "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = Config::load()?;
    info!(api_url = %config.api_url, store = %config.store, "Hamburgueria CLI starting");

    let provider = commands::mount(&config)?;
    let handle = provider.handle();

    match command {
        "login" => commands::login(&mut config, &handle, args.get(1).cloned()).await,
        "logout" => commands::logout(&handle),
        "whoami" => commands::whoami(&handle),
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            Err(anyhow::anyhow!("Unknown command: {}", other))
        }
    }
}
