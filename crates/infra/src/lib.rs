//! Infrastructure layer for the catalog collaborators (record storage).

pub mod store;

pub use store::{InMemoryStore, Store};
