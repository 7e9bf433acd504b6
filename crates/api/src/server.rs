//! HTTP server: owns the application and its mounts, then listens.
//!
//! Lifecycle is encoded in the types. A [`Server`] is *configured* and accepts
//! mounts; [`Server::init`] consumes it and yields a [`RunningServer`], so no
//! router can be added once the socket is open.

use std::net::SocketAddr;

use axum::{Router, http::StatusCode, http::Uri, response::Response};
use tokio::{net::TcpListener, task::JoinHandle};
use tower::ServiceBuilder;

use crate::error::{ServerError, ServerResult};
use crate::middleware;
use crate::response::json_error;
use crate::router::ResourceRouter;

/// Everything a [`Server`] is built from.
#[derive(Debug)]
pub struct ServerConfig {
    /// Application instance to wrap. Required.
    pub app: Option<Router>,
    /// Address `init` binds to.
    pub addr: SocketAddr,
    /// Paths the application already serves. No mount may cover them.
    pub reserved: Vec<String>,
}

impl ServerConfig {
    pub fn new(app: Router, addr: SocketAddr) -> Self {
        Self {
            app: Some(app),
            addr,
            reserved: Vec::new(),
        }
    }

    pub fn reserve(mut self, path: impl Into<String>) -> Self {
        self.reserved.push(path.into());
        self
    }
}

/// A router mounted at a path prefix.
#[derive(Debug)]
pub struct Mount {
    prefix: String,
    router: ResourceRouter,
}

impl Mount {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn router(&self) -> &ResourceRouter {
        &self.router
    }
}

/// A configured, not yet listening HTTP server.
#[derive(Debug)]
pub struct Server {
    app: Router,
    addr: SocketAddr,
    reserved: Vec<String>,
    mounts: Vec<Mount>,
}

impl Server {
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let app = config
            .app
            .ok_or_else(|| ServerError::config("server requires an application instance"))?;

        Ok(Self {
            app,
            addr: config.addr,
            reserved: config.reserved,
            mounts: Vec::new(),
        })
    }

    /// Mount `router` so every request whose path starts with `prefix` is
    /// dispatched into it.
    ///
    /// Mounting an already used prefix replaces the earlier router (last write
    /// wins). Malformed prefixes, and prefixes overlapping a reserved
    /// application path, are rejected; a single trailing `/` is dropped.
    pub fn add_router(&mut self, prefix: &str, router: ResourceRouter) -> ServerResult<()> {
        let prefix = normalize_prefix(prefix)?;
        if let Some(reserved) = self.reserved.iter().find(|r| overlaps(&prefix, r)) {
            tracing::warn!(prefix = %prefix, reserved = %reserved, "mount rejected");
            return Err(ServerError::InvalidPrefix {
                prefix,
                reason: "overlaps a path served by the application",
            });
        }
        if router.is_empty() {
            tracing::warn!(prefix = %prefix, "mounting a router with no routes");
        }

        match self.mounts.iter_mut().find(|m| m.prefix == prefix) {
            Some(existing) => {
                tracing::warn!(prefix = %prefix, "prefix already mounted, replacing earlier router");
                existing.router = router;
            }
            None => {
                tracing::info!(prefix = %prefix, routes = router.routes().len(), "router mounted");
                self.mounts.push(Mount { prefix, router });
            }
        }
        Ok(())
    }

    /// Mounts in registration order.
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Compose the application with every mount, the JSON 404 fallback and
    /// request logging.
    pub fn into_router(self) -> Router {
        let mut app = self.app;
        for mount in self.mounts {
            let nested = mount.router.into_axum();
            // axum refuses to nest at the root.
            app = if mount.prefix == "/" {
                app.merge(nested)
            } else {
                app.nest(&mount.prefix, nested)
            };
        }

        app.fallback(not_found)
            .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
    }

    /// Bind the configured address and start serving in the background.
    ///
    /// Returns as soon as the socket is bound; the serve loop runs on a
    /// spawned task.
    pub async fn init(self) -> ServerResult<RunningServer> {
        let addr = self.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let prefixes: Vec<String> = self.mounts.iter().map(|m| m.prefix.clone()).collect();
        let app = self.into_router();

        tracing::info!(addr = %local_addr, mounts = ?prefixes, "listening");
        let handle = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(RunningServer { local_addr, handle })
    }
}

/// Handle to a listening server.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address actually bound (resolves port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the serve loop to stop.
    pub async fn wait(self) -> ServerResult<()> {
        match self.handle.await {
            Ok(res) => res.map_err(ServerError::Serve),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(ServerError::Serve(std::io::Error::other(e))),
        }
    }

    /// Stop serving. Used for test teardown.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

async fn not_found(uri: Uri) -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("no route for {}", uri.path()),
    )
}

/// True when one path is equal to, or nested under, the other.
fn overlaps(prefix: &str, reserved: &str) -> bool {
    let under = |path: &str, base: &str| {
        path == base
            || base == "/"
            || path
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    under(prefix, reserved) || under(reserved, prefix)
}

fn normalize_prefix(prefix: &str) -> ServerResult<String> {
    let invalid = |reason: &'static str| ServerError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    };

    if prefix.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !prefix.starts_with('/') {
        return Err(invalid("must begin with '/'"));
    }
    if prefix.contains("//") {
        return Err(invalid("must not contain empty segments"));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if prefix.contains([':', '*', '{', '}']) {
        return Err(invalid("must not contain route pattern characters"));
    }

    let normalized = match prefix.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => prefix,
    };
    Ok(normalized.to_string())
}
