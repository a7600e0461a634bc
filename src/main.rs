//! line-echo: a line-oriented TCP echo server
//!
//! Every newline-terminated line a client sends is written straight back
//! to that client. Each connection is served by its own task.
//!
//! Features:
//! - Byte-exact echo, delimiter included
//! - One task per connection, no shared state
//! - Configuration via CLI arguments or TOML file

mod config;
mod error;
mod protocols;
mod server;

use config::{Config, ConfigError};
use error::ServerError;
use server::Server;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(ServerError::Config(ConfigError::MissingPort)) => {
            println!("{}", ConfigError::MissingPort);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging; stdout is reserved for the listening message
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        host = %config.host,
        port = config.port,
        backlog = config.backlog,
        workers = ?config.workers,
        "Starting line-echo server"
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    // 0 means one worker per core, as when unset
    if let Some(workers) = config.workers.filter(|&n| n > 0) {
        builder.worker_threads(workers);
    }
    let runtime = builder.enable_all().build().map_err(ServerError::Runtime)?;

    runtime.block_on(async {
        let server = Server::bind(config.listen_addr(), config.backlog)?;
        println!("Listening on {}", server.local_addr()?);
        server.run().await
    })
}
