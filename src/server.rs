//! TCP server for handling echo connections.
//!
//! Binds the listening socket and runs the accept loop. Each accepted
//! connection is served by its own task; connections share no state.

use crate::error::ServerError;
use crate::protocols::echo::handle_connection;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Server instance
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// Must be called from within a Tokio runtime. On failure no socket is
    /// left open.
    pub fn bind(addr: SocketAddr, backlog: u32) -> Result<Self, ServerError> {
        let listener = create_listener(addr, backlog)
            .and_then(TcpListener::from_std)
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Server { listener })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Accept connections until accept fails.
    ///
    /// Only returns on an accept error; connection errors never reach here.
    pub async fn run(self) -> Result<(), ServerError> {
        info!(address = %self.local_addr()?, "Server listening");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    return Err(ServerError::Accept(e));
                }
            };
            debug!(peer = %peer, "New connection");

            tokio::spawn(async move {
                match handle_connection(stream).await {
                    Ok(()) => debug!(peer = %peer, "Connection closed"),
                    Err(e) => debug!(peer = %peer, error = %e, "Connection error"),
                }
            });
        }
    }
}

/// Create a non-blocking listening socket.
///
/// `SO_REUSEPORT` is left unset so a port held by another listener fails
/// to bind.
fn create_listener(addr: SocketAddr, backlog: u32) -> io::Result<std::net::TcpListener> {
    let socket = socket2::Socket::new(
        match addr {
            SocketAddr::V4(_) => socket2::Domain::IPV4,
            SocketAddr::V6(_) => socket2::Domain::IPV6,
        },
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;

    Ok(socket.into())
}
