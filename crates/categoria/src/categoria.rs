use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalogo_core::{CategoriaId, DomainResult, Entity, error::require_non_blank};

/// Input for creating a categoria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategoria {
    pub nome: String,
    pub descricao: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriaPatch {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categoria {
    id: CategoriaId,
    nome: String,
    descricao: Option<String>,
    criado_em: DateTime<Utc>,
    atualizado_em: DateTime<Utc>,
}

impl Categoria {
    pub fn create(id: CategoriaId, input: NewCategoria, now: DateTime<Utc>) -> DomainResult<Self> {
        require_non_blank("nome", &input.nome)?;

        Ok(Self {
            id,
            nome: input.nome.trim().to_string(),
            descricao: normalize_descricao(input.descricao),
            criado_em: now,
            atualizado_em: now,
        })
    }

    /// Apply a partial update. On error the categoria is left unchanged.
    pub fn apply(&mut self, patch: CategoriaPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(nome) = &patch.nome {
            require_non_blank("nome", nome)?;
        }

        if let Some(nome) = patch.nome {
            self.nome = nome.trim().to_string();
        }
        if patch.descricao.is_some() {
            self.descricao = normalize_descricao(patch.descricao);
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

    pub fn criado_em(&self) -> DateTime<Utc> {
        self.criado_em
    }

    pub fn atualizado_em(&self) -> DateTime<Utc> {
        self.atualizado_em
    }
}

impl Entity for Categoria {
    type Id = CategoriaId;

    fn id(&self) -> CategoriaId {
        self.id
    }
}

// Empty descriptions are stored as absent.
fn normalize_descricao(descricao: Option<String>) -> Option<String> {
    descricao
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
