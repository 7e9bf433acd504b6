//! The catalog application: the categoria and produto resources plus their docs.
//!
//! - `services.rs`: in-memory stores and the cross-resource rules
//! - `routes/`: one `ResourceRouter` per resource
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: the OpenAPI document rendered by the UI under `/api-docs`

use std::sync::Arc;

use utoipa::OpenApi;

use crate::composer::ApiComposer;
use crate::config::HttpConfig;
use crate::docs::DocsMiddleware;
use crate::router::ResourceMount;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

pub const CATEGORIA_PREFIX: &str = "/api/categoria";
pub const PRODUTO_PREFIX: &str = "/api/produto";

/// The resource table, in mount order.
pub fn catalog_mounts(services: Arc<services::CatalogServices>) -> Vec<ResourceMount> {
    vec![
        ResourceMount::new(CATEGORIA_PREFIX, routes::categoria::router(services.clone())),
        ResourceMount::new(PRODUTO_PREFIX, routes::produto::router(services)),
    ]
}

/// Build the composer for the full catalog API (public entrypoint used by `main.rs`).
pub fn build_composer(http: HttpConfig) -> ApiComposer {
    let services = Arc::new(services::CatalogServices::new());
    let docs = DocsMiddleware::new(openapi::ApiDoc::openapi());

    ApiComposer::new(http, docs, catalog_mounts(services))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    async fn send(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn app() -> axum::Router {
        build_composer(HttpConfig::default())
            .compose()
            .unwrap()
            .into_router()
    }

    #[test]
    fn mounts_categoria_then_produto() {
        let composer = build_composer(HttpConfig::default());
        let prefixes: Vec<&str> = composer.resources().iter().map(|m| m.prefix.as_str()).collect();
        assert_eq!(prefixes, vec![CATEGORIA_PREFIX, PRODUTO_PREFIX]);
    }

    #[test]
    fn openapi_document_lists_both_resources() {
        let doc = openapi::ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/categoria"));
        assert!(doc.paths.paths.contains_key("/api/categoria/{id}"));
        assert!(doc.paths.paths.contains_key("/api/produto"));
        assert!(doc.paths.paths.contains_key("/api/produto/{id}"));
    }

    #[tokio::test]
    async fn categoria_crud_over_router() {
        let app = app();

        let (status, created) = send(
            app.clone(),
            "POST",
            "/api/categoria",
            Some(serde_json::json!({ "nome": "Bebidas" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, listed) = send(app.clone(), "GET", "/api/categoria", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, updated) = send(
            app.clone(),
            "PUT",
            &format!("/api/categoria/{id}"),
            Some(serde_json::json!({ "descricao": "Sucos e refrigerantes" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["nome"], "Bebidas");
        assert_eq!(updated["descricao"], "Sucos e refrigerantes");

        let (status, _) = send(app.clone(), "DELETE", &format!("/api/categoria/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(app, "GET", &format!("/api/categoria/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn produto_categoria_link_rules() {
        let app = app();

        let (status, body) = send(app.clone(), "GET", "/api/produto/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_id");

        let (_, categoria) = send(
            app.clone(),
            "POST",
            "/api/categoria",
            Some(serde_json::json!({ "nome": "Padaria" })),
        )
        .await;
        let categoria_id = categoria["id"].as_str().unwrap().to_string();

        let (status, produto) = send(
            app.clone(),
            "POST",
            "/api/produto",
            Some(serde_json::json!({ "nome": "Pao", "preco": 150, "categoria_id": categoria_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(produto["categoria_id"], categoria_id.as_str());

        let (status, filtered) = send(
            app.clone(),
            "GET",
            &format!("/api/produto?categoria_id={categoria_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(filtered.as_array().unwrap().len(), 1);

        let (status, body) =
            send(app.clone(), "DELETE", &format!("/api/categoria/{categoria_id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");

        let produto_id = produto["id"].as_str().unwrap().to_string();
        let (status, detached) = send(
            app.clone(),
            "PUT",
            &format!("/api/produto/{produto_id}"),
            Some(serde_json::json!({ "categoria_id": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(detached["categoria_id"].is_null());

        let (status, _) =
            send(app.clone(), "DELETE", &format!("/api/categoria/{categoria_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let unknown = catalogo_core::CategoriaId::new().to_string();
        let (status, body) = send(
            app,
            "POST",
            "/api/produto",
            Some(serde_json::json!({ "nome": "Bolo", "preco": 900, "categoria_id": unknown })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
