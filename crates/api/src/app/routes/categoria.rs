use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use catalogo_core::{CategoriaId, Entity};

use crate::app::dto::{
    self, CategoriaResponse, CreateCategoriaRequest, ErrorResponse, UpdateCategoriaRequest,
};
use crate::app::errors::domain_error_to_response;
use crate::app::routes::HandlerResult;
use crate::app::services::CatalogServices;
use crate::router::{ResourceRouter, Verb};

pub fn router(services: Arc<CatalogServices>) -> ResourceRouter {
    ResourceRouter::new()
        .route_with_state(Verb::Get, "/", list_categorias, services.clone())
        .route_with_state(Verb::Post, "/", create_categoria, services.clone())
        .route_with_state(Verb::Get, "/:id", get_categoria, services.clone())
        .route_with_state(Verb::Put, "/:id", update_categoria, services.clone())
        .route_with_state(Verb::Delete, "/:id", delete_categoria, services)
}

fn parse_id(raw: &str) -> Result<CategoriaId, axum::response::Response> {
    raw.parse().map_err(domain_error_to_response)
}

#[utoipa::path(
    get,
    path = "/api/categoria",
    tag = "categoria",
    responses((status = 200, description = "All categorias", body = [CategoriaResponse]))
)]
pub async fn list_categorias(State(services): State<Arc<CatalogServices>>) -> HandlerResult {
    let items = services
        .categorias_list()
        .iter()
        .map(dto::categoria_to_response)
        .collect::<Vec<_>>();
    Ok((StatusCode::OK, Json(items)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/categoria",
    tag = "categoria",
    request_body = CreateCategoriaRequest,
    responses(
        (status = 201, description = "Categoria created", body = CategoriaResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_categoria(
    State(services): State<Arc<CatalogServices>>,
    Json(body): Json<CreateCategoriaRequest>,
) -> HandlerResult {
    let categoria = services
        .categoria_create(body.into())
        .map_err(domain_error_to_response)?;
    tracing::info!(id = %categoria.id(), "categoria created");

    Ok((StatusCode::CREATED, Json(dto::categoria_to_response(&categoria))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/categoria/{id}",
    tag = "categoria",
    params(("id" = String, Path, description = "Categoria id")),
    responses(
        (status = 200, description = "The categoria", body = CategoriaResponse),
        (status = 404, description = "Unknown categoria", body = ErrorResponse)
    )
)]
pub async fn get_categoria(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let categoria = services.categoria_get(id).map_err(domain_error_to_response)?;
    Ok((StatusCode::OK, Json(dto::categoria_to_response(&categoria))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/categoria/{id}",
    tag = "categoria",
    params(("id" = String, Path, description = "Categoria id")),
    request_body = UpdateCategoriaRequest,
    responses(
        (status = 200, description = "Categoria updated", body = CategoriaResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Unknown categoria", body = ErrorResponse)
    )
)]
pub async fn update_categoria(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCategoriaRequest>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let categoria = services
        .categoria_update(id, body.into())
        .map_err(domain_error_to_response)?;
    Ok((StatusCode::OK, Json(dto::categoria_to_response(&categoria))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/categoria/{id}",
    tag = "categoria",
    params(("id" = String, Path, description = "Categoria id")),
    responses(
        (status = 204, description = "Categoria deleted"),
        (status = 404, description = "Unknown categoria", body = ErrorResponse),
        (status = 409, description = "Categoria still has produtos", body = ErrorResponse)
    )
)]
pub async fn delete_categoria(
    State(services): State<Arc<CatalogServices>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    services.categoria_delete(id).map_err(domain_error_to_response)?;
    tracing::info!(%id, "categoria deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
