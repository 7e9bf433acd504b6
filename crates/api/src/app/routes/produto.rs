use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use catalogo_core::{Entity, ProdutoId};

use crate::app::dto::{
    self, CreateProdutoRequest, ErrorResponse, ProdutoFilter, ProdutoResponse, UpdateProdutoRequest,
};
use crate::app::errors::domain_error_to_response;
use crate::app::routes::HandlerResult;
use crate::app::services::CatalogServices;
use crate::router::{ResourceRouter, Verb};

pub fn router(services: Arc<CatalogServices>) -> ResourceRouter {
    ResourceRouter::new()
        .route_with_state(Verb::Get, "/", list_produtos, services.clone())
        .route_with_state(Verb::Post, "/", create_produto, services.clone())
        .route_with_state(Verb::Get, "/:id", get_produto, services.clone())
        .route_with_state(Verb::Put, "/:id", update_produto, services.clone())
        .route_with_state(Verb::Delete, "/:id", delete_produto, services)
}

fn parse_id(raw: &str) -> Result<ProdutoId, axum::response::Response> {
    raw.parse().map_err(domain_error_to_response)
}

#[utoipa::path(
    get,
    path = "/api/produto",
    tag = "produto",
    params(ProdutoFilter),
    responses(
        (status = 200, description = "Produtos, optionally filtered by categoria", body = [ProdutoResponse]),
        (status = 400, description = "Malformed categoria_id", body = ErrorResponse)
    )
)]
pub async fn list_produtos(
    State(services): State<Arc<CatalogServices>>,
    Query(filter): Query<ProdutoFilter>,
) -> HandlerResult {
    let categoria_id = dto::parse_categoria_id(filter.categoria_id).map_err(domain_error_to_response)?;
    let items = services
        .produtos_list(categoria_id)
        .iter()
        .map(dto::produto_to_response)
        .collect::<Vec<_>>();
    Ok((StatusCode::OK, Json(items)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/produto",
    tag = "produto",
    request_body = CreateProdutoRequest,
    responses(
        (status = 201, description = "Produto created", body = ProdutoResponse),
        (status = 400, description = "Invalid input or unknown categoria", body = ErrorResponse)
    )
)]
pub async fn create_produto(
    State(services): State<Arc<CatalogServices>>,
    Json(body): Json<CreateProdutoRequest>,
) -> HandlerResult {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let produto = services.produto_create(input).map_err(domain_error_to_response)?;
    tracing::info!(id = %produto.id(), "produto created");

    Ok((StatusCode::CREATED, Json(dto::produto_to_response(&produto))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/produto/{id}",
    tag = "produto",
    params(("id" = String, Path, description = "Produto id")),
    responses(
        (status = 200, description = "The produto", body = ProdutoResponse),
        (status = 404, description = "Unknown produto", body = ErrorResponse)
    )
)]
pub async fn get_produto(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let produto = services.produto_get(id).map_err(domain_error_to_response)?;
    Ok((StatusCode::OK, Json(dto::produto_to_response(&produto))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/produto/{id}",
    tag = "produto",
    params(("id" = String, Path, description = "Produto id")),
    request_body = UpdateProdutoRequest,
    responses(
        (status = 200, description = "Produto updated", body = ProdutoResponse),
        (status = 400, description = "Invalid input or unknown categoria", body = ErrorResponse),
        (status = 404, description = "Unknown produto", body = ErrorResponse)
    )
)]
pub async fn update_produto(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProdutoRequest>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let patch = body.into_domain().map_err(domain_error_to_response)?;
    let produto = services
        .produto_update(id, patch)
        .map_err(domain_error_to_response)?;
    Ok((StatusCode::OK, Json(dto::produto_to_response(&produto))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/produto/{id}",
    tag = "produto",
    params(("id" = String, Path, description = "Produto id")),
    responses(
        (status = 204, description = "Produto deleted"),
        (status = 404, description = "Unknown produto", body = ErrorResponse)
    )
)]
pub async fn delete_produto(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    services.produto_delete(id).map_err(domain_error_to_response)?;
    tracing::info!(%id, "produto deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
