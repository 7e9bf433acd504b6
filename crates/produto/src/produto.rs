use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalogo_core::{CategoriaId, DomainResult, Entity, ProdutoId, error::require_non_blank};

/// Input for creating a produto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduto {
    pub nome: String,
    pub descricao: Option<String>,
    /// Price in the smallest currency unit (centavos).
    pub preco: u64,
    pub categoria_id: Option<CategoriaId>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdutoPatch {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<u64>,
    /// `Some(Some(id))` moves the produto, `Some(None)` detaches it from its categoria.
    pub categoria_id: Option<Option<CategoriaId>>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produto {
    id: ProdutoId,
    nome: String,
    descricao: Option<String>,
    preco: u64,
    categoria_id: Option<CategoriaId>,
    criado_em: DateTime<Utc>,
    atualizado_em: DateTime<Utc>,
}

impl Produto {
    pub fn create(id: ProdutoId, input: NewProduto, now: DateTime<Utc>) -> DomainResult<Self> {
        require_non_blank("nome", &input.nome)?;

        Ok(Self {
            id,
            nome: input.nome.trim().to_string(),
            descricao: input
                .descricao
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            preco: input.preco,
            categoria_id: input.categoria_id,
            criado_em: now,
            atualizado_em: now,
        })
    }

    /// Apply a partial update. On error the produto is left unchanged.
    pub fn apply(&mut self, patch: ProdutoPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(nome) = &patch.nome {
            require_non_blank("nome", nome)?;
        }

        if let Some(nome) = patch.nome {
            self.nome = nome.trim().to_string();
        }
        if let Some(descricao) = patch.descricao {
            let descricao = descricao.trim();
            self.descricao = (!descricao.is_empty()).then(|| descricao.to_string());
        }
        if let Some(preco) = patch.preco {
            self.preco = preco;
        }
        if let Some(categoria_id) = patch.categoria_id {
            self.categoria_id = categoria_id;
        }
        self.atualizado_em = now;
        Ok(())
    }

    pub fn nome(&self) -> &str {
        &self.nome
    }

    pub fn descricao(&self) -> Option<&str> {
        self.descricao.as_deref()
    }

    pub fn preco(&self) -> u64 {
        self.preco
    }

    pub fn categoria_id(&self) -> Option<CategoriaId> {
        self.categoria_id
    }

    /// Whether this produto is filed under the given categoria.
    pub fn belongs_to(&self, categoria_id: CategoriaId) -> bool {
        self.categoria_id == Some(categoria_id)
    }

    pub fn criado_em(&self) -> DateTime<Utc> {
        self.criado_em
    }

    pub fn atualizado_em(&self) -> DateTime<Utc> {
        self.atualizado_em
    }
}

impl Entity for Produto {
    type Id = ProdutoId;

    fn id(&self) -> ProdutoId {
        self.id
    }
}
