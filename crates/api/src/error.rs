//! Server composition and startup errors.

use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server composition and startup.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors surfaced while building or starting the HTTP server.
///
/// None of these are recovered from locally: they propagate to `main` and
/// terminate startup.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing application instance or malformed ambient configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A mount prefix was rejected by [`Server::add_router`](crate::server::Server::add_router).
    #[error("invalid mount prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// The listening socket could not be acquired (e.g. address in use).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop stopped with an error.
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when binding failed because the address is already taken.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            ServerError::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}
