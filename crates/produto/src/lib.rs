//! Produto domain module.
//!
//! Catalog products: naming, pricing and the optional link to a categoria.

pub mod produto;

pub use produto::{NewProduto, Produto, ProdutoPatch};
