//! Top-level wiring: application + docs + resource mounts, then listen.

use axum::{Router, http::StatusCode, routing::get};

use crate::config::HttpConfig;
use crate::docs::DocsMiddleware;
use crate::error::ServerResult;
use crate::router::ResourceMount;
use crate::server::{RunningServer, Server, ServerConfig};

pub const HEALTH_PATH: &str = "/health";

/// Builds the fixed service topology and starts it.
///
/// The resource table is supplied at construction and never changes, so the
/// composer can be exercised with stub routers.
#[derive(Debug, Clone)]
pub struct ApiComposer {
    http: HttpConfig,
    docs: DocsMiddleware,
    resources: Vec<ResourceMount>,
}

impl ApiComposer {
    pub fn new(http: HttpConfig, docs: DocsMiddleware, resources: Vec<ResourceMount>) -> Self {
        Self {
            http,
            docs,
            resources,
        }
    }

    pub fn resources(&self) -> &[ResourceMount] {
        &self.resources
    }

    /// Assemble the server without binding.
    pub fn compose(&self) -> ServerResult<Server> {
        let app = Router::new().route(HEALTH_PATH, get(health));
        let app = self.docs.mount(app);
        tracing::info!(path = %self.docs.path(), "api docs mounted");

        let mut config = ServerConfig::new(app, self.http.socket_addr()).reserve(HEALTH_PATH);
        for path in self.docs.reserved_paths() {
            config = config.reserve(path);
        }
        let mut server = Server::new(config)?;
        for mount in &self.resources {
            server.add_router(&mount.prefix, mount.router.clone())?;
        }
        Ok(server)
    }

    /// Compose and start listening.
    ///
    /// Not idempotent: a second call binds the same address again and fails
    /// with [`ServerError::Bind`](crate::error::ServerError::Bind) while the
    /// first server is still up.
    pub async fn start(&self) -> ServerResult<RunningServer> {
        self.compose()?.init().await
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::{IpAddr, Ipv4Addr};

    use crate::error::ServerError;
    use crate::router::{ResourceRouter, Verb};

    fn docs() -> DocsMiddleware {
        DocsMiddleware::new(
            utoipa::openapi::OpenApiBuilder::new()
                .info(utoipa::openapi::InfoBuilder::new().title("t").version("0").build())
                .build(),
        )
    }

    fn loopback(port: u16) -> HttpConfig {
        HttpConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[test]
    fn compose_mounts_every_resource_in_order() {
        let composer = ApiComposer::new(
            loopback(0),
            docs(),
            vec![
                ResourceMount::new("/api/categoria", ResourceRouter::new().route(Verb::Get, "/", health)),
                ResourceMount::new("/api/produto", ResourceRouter::new().route(Verb::Get, "/", health)),
            ],
        );

        let server = composer.compose().unwrap();
        let prefixes: Vec<&str> = server.mounts().iter().map(|m| m.prefix()).collect();
        assert_eq!(prefixes, vec!["/api/categoria", "/api/produto"]);
    }

    #[tokio::test]
    async fn mount_colliding_with_docs_fails_start_without_binding() {
        let port = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let composer = ApiComposer::new(
            loopback(port),
            docs(),
            vec![
                ResourceMount::new("/api/categoria", ResourceRouter::new().route(Verb::Get, "/", health)),
                ResourceMount::new("/api-docs", ResourceRouter::new().route(Verb::Get, "/", health)),
            ],
        );

        let err = composer.start().await.unwrap_err();
        assert!(
            matches!(&err, ServerError::InvalidPrefix { prefix, .. } if prefix == "/api-docs"),
            "unexpected error: {err:?}"
        );

        // The port was never taken.
        std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, port)).unwrap();
    }

    #[test]
    fn health_path_is_reserved() {
        let composer = ApiComposer::new(
            loopback(0),
            docs(),
            vec![ResourceMount::new(HEALTH_PATH, ResourceRouter::new())],
        );
        assert!(matches!(
            composer.compose(),
            Err(ServerError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn bad_prefix_in_table_fails_composition() {
        let composer = ApiComposer::new(
            loopback(0),
            docs(),
            vec![ResourceMount::new("api/categoria", ResourceRouter::new())],
        );

        assert!(matches!(
            composer.compose(),
            Err(ServerError::InvalidPrefix { .. })
        ));
    }
}
