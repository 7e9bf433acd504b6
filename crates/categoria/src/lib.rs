//! Categoria domain module.
//!
//! Business rules for product categories, as plain deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod categoria;

pub use categoria::{Categoria, CategoriaPatch, NewCategoria};
