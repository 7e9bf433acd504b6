//! One module per resource; each builds the [`ResourceRouter`](crate::router::ResourceRouter)
//! mounted under its prefix.

pub mod categoria;
pub mod produto;

use axum::response::Response;

/// Handlers short-circuit with a ready-made error response.
pub type HandlerResult = Result<Response, Response>;
