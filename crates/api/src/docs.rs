//! API documentation: Swagger UI plus the OpenAPI document it renders.

use axum::Router;
use utoipa::openapi::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Where the documentation UI is mounted by default.
pub const DOCS_PATH: &str = "/api-docs";

/// Where the OpenAPI document is served by default.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// The documentation handler pair.
///
/// - `GET {path}`: redirects to `{path}/`, the interactive Swagger UI
/// - `GET {spec_path}`: the OpenAPI document
#[derive(Debug, Clone)]
pub struct DocsMiddleware {
    path: String,
    spec_path: String,
    spec: OpenApi,
}

impl DocsMiddleware {
    pub fn new(spec: OpenApi) -> Self {
        Self::at(DOCS_PATH, OPENAPI_PATH, spec)
    }

    pub fn at(path: impl Into<String>, spec_path: impl Into<String>, spec: OpenApi) -> Self {
        Self {
            path: path.into(),
            spec_path: spec_path.into(),
            spec,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Paths served by [`mount`](Self::mount); resource routers must stay clear of them.
    pub fn reserved_paths(&self) -> [&str; 2] {
        [&self.path, &self.spec_path]
    }

    /// Merge the UI and spec routes into `app`.
    pub fn mount(&self, app: Router) -> Router {
        app.merge(SwaggerUi::new(self.path.clone()).url(self.spec_path.clone(), self.spec.clone()))
    }
}
