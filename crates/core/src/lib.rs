//! `catalogo-core`: shared domain building blocks for the catalog resources.
//!
//! Pure domain primitives only (no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoriaId, ProdutoId};
