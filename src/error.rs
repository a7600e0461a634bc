//! Error types for the echo server.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the server from starting or from accepting connections.
///
/// Per-connection I/O errors are not represented here; they end only the
/// connection that raised them.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
