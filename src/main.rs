//! b2c - Azure AD B2C directory management from the command line.
//!
//! Each run acquires one client-credentials token, makes one Microsoft Graph
//! call and prints the result.

#![deny(clippy::all)]

mod auth;
mod cli;
mod commands;
mod config;
mod error;
mod graph;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::Config;
use error::AppError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        output::display_error(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    // Argument problems are reported before any configuration or network access
    let command = match Command::parse(&cli.args)? {
        Command::Help => {
            output::print_help();
            return Ok(());
        }
        Command::Syntax => {
            output::print_syntax();
            return Ok(());
        }
        Command::Graph(command) => command,
    };

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.logging.level, cli.verbose);

    let response = commands::execute(&command, &config).await?;
    output::print_response(&response);

    let hints = commands::follow_up_hints(&command, &response)?;
    output::print_hints(&hints);

    Ok(())
}

/// Initialize tracing/logging on stderr.
fn init_logging(level: &str, verbose: u8) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = log_directives(rust_log.as_deref(), level, verbose);
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Filter directives in precedence order: a non-empty `RUST_LOG`, then `-v`
/// (info) or `-vv` (debug), then the configured level.
fn log_directives(rust_log: Option<&str>, configured: &str, verbose: u8) -> String {
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => directives.to_string(),
        None => match verbose {
            0 => configured.to_string(),
            1 => "warn,b2c=info".to_string(),
            _ => "warn,b2c=debug".to_string(),
        },
    }
}
