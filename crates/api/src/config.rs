//! Listener configuration, read from the environment.
//!
//! - `CATALOGO_HOST`: bind address (default `0.0.0.0`)
//! - `CATALOGO_PORT`, falling back to `PORT`: bind port (default `3000`)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl HttpConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self { host, port }
    }

    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("CATALOGO_HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|e| ServerError::config(format!("CATALOGO_HOST={host:?}: {e}")))?;
        }

        let port = lookup("CATALOGO_PORT")
            .map(|v| ("CATALOGO_PORT", v))
            .or_else(|| lookup("PORT").map(|v| ("PORT", v)));
        if let Some((key, port)) = port {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ServerError::config(format!("{key}={port:?}: {e}")))?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
