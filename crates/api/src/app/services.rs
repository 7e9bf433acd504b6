//! Service wiring for the resource handlers: stores plus the cross-resource rules.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use catalogo_categoria::{Categoria, CategoriaPatch, NewCategoria};
use catalogo_core::{CategoriaId, DomainError, DomainResult, ProdutoId};
use catalogo_infra::{InMemoryStore, Store};
use catalogo_produto::{NewProduto, Produto, ProdutoPatch};

/// Shared state behind the categoria and produto routers.
///
/// Every write runs under `writes`, so checks across both stores (a produto's
/// categoria exists, a deleted categoria has no produtos) hold when the write lands.
#[derive(Debug, Default)]
pub struct CatalogServices {
    categorias: InMemoryStore<Categoria>,
    produtos: InMemoryStore<Produto>,
    writes: Mutex<()>,
}

impl CatalogServices {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------
    // Categorias
    // -------------------------

    pub fn categorias_list(&self) -> Vec<Categoria> {
        self.categorias.list()
    }

    pub fn categoria_get(&self, id: CategoriaId) -> DomainResult<Categoria> {
        self.categorias
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("categoria {id}")))
    }

    pub fn categoria_create(&self, input: NewCategoria) -> DomainResult<Categoria> {
        let _writes = self.write_lock();
        let categoria = Categoria::create(CategoriaId::new(), input, Utc::now())?;
        self.categorias.save(categoria.clone());
        Ok(categoria)
    }

    pub fn categoria_update(&self, id: CategoriaId, patch: CategoriaPatch) -> DomainResult<Categoria> {
        let _writes = self.write_lock();
        let mut categoria = self.categoria_get(id)?;
        categoria.apply(patch, Utc::now())?;
        self.categorias.save(categoria.clone());
        Ok(categoria)
    }

    /// Deleting a categoria still referenced by produtos is a conflict.
    pub fn categoria_delete(&self, id: CategoriaId) -> DomainResult<()> {
        let _writes = self.write_lock();
        self.categoria_get(id)?;

        let referenced = self.produtos.list().iter().filter(|p| p.belongs_to(id)).count();
        if referenced > 0 {
            return Err(DomainError::conflict(format!(
                "categoria {id} still has {referenced} produto(s)"
            )));
        }

        self.categorias.remove(&id);
        Ok(())
    }

    // -------------------------
    // Produtos
    // -------------------------

    pub fn produtos_list(&self, categoria_id: Option<CategoriaId>) -> Vec<Produto> {
        let produtos = self.produtos.list();
        match categoria_id {
            Some(categoria_id) => produtos
                .into_iter()
                .filter(|p| p.belongs_to(categoria_id))
                .collect(),
            None => produtos,
        }
    }

    pub fn produto_get(&self, id: ProdutoId) -> DomainResult<Produto> {
        self.produtos
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("produto {id}")))
    }

    pub fn produto_create(&self, input: NewProduto) -> DomainResult<Produto> {
        let _writes = self.write_lock();
        if let Some(categoria_id) = input.categoria_id {
            self.require_categoria(categoria_id)?;
        }
        let produto = Produto::create(ProdutoId::new(), input, Utc::now())?;
        self.produtos.save(produto.clone());
        Ok(produto)
    }

    pub fn produto_update(&self, id: ProdutoId, patch: ProdutoPatch) -> DomainResult<Produto> {
        let _writes = self.write_lock();
        let mut produto = self.produto_get(id)?;
        if let Some(Some(categoria_id)) = patch.categoria_id {
            self.require_categoria(categoria_id)?;
        }
        produto.apply(patch, Utc::now())?;
        self.produtos.save(produto.clone());
        Ok(produto)
    }

    pub fn produto_delete(&self, id: ProdutoId) -> DomainResult<()> {
        let _writes = self.write_lock();
        self.produtos
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("produto {id}")))
    }

    fn require_categoria(&self, id: CategoriaId) -> DomainResult<()> {
        if self.categorias.contains(&id) {
            Ok(())
        } else {
            Err(DomainError::validation(format!("categoria {id} does not exist")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogo_core::Entity;
    use std::sync::Barrier;

    fn new_categoria(nome: &str) -> NewCategoria {
        NewCategoria {
            nome: nome.to_string(),
            descricao: None,
        }
    }

    fn new_produto(nome: &str, categoria_id: Option<CategoriaId>) -> NewProduto {
        NewProduto {
            nome: nome.to_string(),
            descricao: None,
            preco: 500,
            categoria_id,
        }
    }

    #[test]
    fn produto_requires_existing_categoria() {
        let services = CatalogServices::new();
        let err = services
            .produto_create(new_produto("Pão", Some(CategoriaId::new())))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(services.produtos_list(None).is_empty());
    }

    #[test]
    fn referenced_categoria_cannot_be_deleted() {
        let services = CatalogServices::new();
        let padaria = services.categoria_create(new_categoria("Padaria")).unwrap();
        let pao = services
            .produto_create(new_produto("Pão", Some(padaria.id())))
            .unwrap();

        let err = services.categoria_delete(padaria.id()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        services.produto_delete(pao.id()).unwrap();
        services.categoria_delete(padaria.id()).unwrap();
        assert!(services.categorias_list().is_empty());
    }

    #[test]
    fn produtos_can_be_filtered_by_categoria() {
        let services = CatalogServices::new();
        let bebidas = services.categoria_create(new_categoria("Bebidas")).unwrap();
        services
            .produto_create(new_produto("Suco", Some(bebidas.id())))
            .unwrap();
        services.produto_create(new_produto("Sabão", None)).unwrap();

        let filtered = services.produtos_list(Some(bebidas.id()));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].nome(), "Suco");
        assert_eq!(services.produtos_list(None).len(), 2);
    }

    #[test]
    fn missing_records_are_not_found() {
        let services = CatalogServices::new();
        assert!(matches!(
            services.categoria_update(CategoriaId::new(), CategoriaPatch::default()),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            services.produto_delete(ProdutoId::new()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn detached_produto_frees_its_categoria() {
        let services = CatalogServices::new();
        let padaria = services.categoria_create(new_categoria("Padaria")).unwrap();
        let pao = services
            .produto_create(new_produto("Pão", Some(padaria.id())))
            .unwrap();

        let pao = services
            .produto_update(
                pao.id(),
                ProdutoPatch {
                    categoria_id: Some(None),
                    ..ProdutoPatch::default()
                },
            )
            .unwrap();
        assert_eq!(pao.categoria_id(), None);
        services.categoria_delete(padaria.id()).unwrap();
    }

    #[test]
    fn concurrent_update_cannot_resurrect_a_deleted_produto() {
        let services = CatalogServices::new();
        for _ in 0..200 {
            let pao = services.produto_create(new_produto("Pão", None)).unwrap();
            let barrier = Barrier::new(2);

            std::thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    let patch = ProdutoPatch {
                        preco: Some(1),
                        ..ProdutoPatch::default()
                    };
                    let _ = services.produto_update(pao.id(), patch);
                });
                s.spawn(|| {
                    barrier.wait();
                    services.produto_delete(pao.id()).unwrap();
                });
            });

            assert!(services.produto_get(pao.id()).is_err());
        }
    }

    #[test]
    fn concurrent_create_and_delete_never_leave_a_dangling_categoria() {
        let services = CatalogServices::new();
        for _ in 0..200 {
            let categoria = services.categoria_create(new_categoria("Bebidas")).unwrap();
            let barrier = Barrier::new(2);

            std::thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    let _ = services.produto_create(new_produto("Suco", Some(categoria.id())));
                });
                s.spawn(|| {
                    barrier.wait();
                    let _ = services.categoria_delete(categoria.id());
                });
            });

            let categoria_exists = services.categoria_get(categoria.id()).is_ok();
            let referenced = !services.produtos_list(Some(categoria.id())).is_empty();
            assert!(categoria_exists || !referenced);

            for produto in services.produtos_list(Some(categoria.id())) {
                services.produto_delete(produto.id()).unwrap();
            }
        }
    }
}
