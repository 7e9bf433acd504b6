//! HTTP API: server bootstrap, resource routing, docs, and the catalog application.

pub mod app;
pub mod composer;
pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod response;
pub mod router;
pub mod server;

pub use composer::ApiComposer;
pub use config::HttpConfig;
pub use docs::{DOCS_PATH, DocsMiddleware, OPENAPI_PATH};
pub use error::{ServerError, ServerResult};
pub use router::{RequestHandler, ResourceMount, ResourceRouter, Verb, handler_fn};
pub use server::{RunningServer, Server, ServerConfig};
