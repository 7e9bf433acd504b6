//! Request/response DTOs and mapping to/from domain types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use catalogo_categoria::{Categoria, CategoriaPatch, NewCategoria};
use catalogo_core::{CategoriaId, DomainResult, Entity};
use catalogo_produto::{NewProduto, Produto, ProdutoPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoriaRequest {
    pub nome: String,
    pub descricao: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoriaRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProdutoRequest {
    pub nome: String,
    pub descricao: Option<String>,
    /// Price in centavos.
    pub preco: u64,
    pub categoria_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProdutoRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<u64>,
    /// Absent leaves the categoria as is; `null` detaches the produto.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub categoria_id: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProdutoFilter {
    /// Only produtos of this categoria.
    pub categoria_id: Option<String>,
}

impl From<CreateCategoriaRequest> for NewCategoria {
    fn from(body: CreateCategoriaRequest) -> Self {
        Self {
            nome: body.nome,
            descricao: body.descricao,
        }
    }
}

impl From<UpdateCategoriaRequest> for CategoriaPatch {
    fn from(body: UpdateCategoriaRequest) -> Self {
        Self {
            nome: body.nome,
            descricao: body.descricao,
        }
    }
}

impl CreateProdutoRequest {
    pub fn into_domain(self) -> DomainResult<NewProduto> {
        Ok(NewProduto {
            nome: self.nome,
            descricao: self.descricao,
            preco: self.preco,
            categoria_id: parse_categoria_id(self.categoria_id)?,
        })
    }
}

impl UpdateProdutoRequest {
    pub fn into_domain(self) -> DomainResult<ProdutoPatch> {
        Ok(ProdutoPatch {
            nome: self.nome,
            descricao: self.descricao,
            preco: self.preco,
            categoria_id: self.categoria_id.map(parse_categoria_id).transpose()?,
        })
    }
}

pub fn parse_categoria_id(raw: Option<String>) -> DomainResult<Option<CategoriaId>> {
    raw.map(|s| s.parse()).transpose()
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriaResponse {
    pub id: String,
    pub nome: String,
    pub descricao: Option<String>,
    pub criado_em: String,
    pub atualizado_em: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProdutoResponse {
    pub id: String,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: u64,
    pub categoria_id: Option<String>,
    pub criado_em: String,
    pub atualizado_em: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub fn categoria_to_response(c: &Categoria) -> CategoriaResponse {
    CategoriaResponse {
        id: c.id().to_string(),
        nome: c.nome().to_string(),
        descricao: c.descricao().map(str::to_string),
        criado_em: c.criado_em().to_rfc3339(),
        atualizado_em: c.atualizado_em().to_rfc3339(),
    }
}

pub fn produto_to_response(p: &Produto) -> ProdutoResponse {
    ProdutoResponse {
        id: p.id().to_string(),
        nome: p.nome().to_string(),
        descricao: p.descricao().map(str::to_string),
        preco: p.preco(),
        categoria_id: p.categoria_id().map(|id| id.to_string()),
        criado_em: p.criado_em().to_rfc3339(),
        atualizado_em: p.atualizado_em().to_rfc3339(),
    }
}
