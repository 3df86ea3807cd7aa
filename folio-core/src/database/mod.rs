//! Catalog store: the repository port and its adapters.

pub mod memory;
pub mod ports;
pub mod postgres;
pub mod repositories;

pub use memory::InMemoryCatalog;
pub use ports::{CatalogRepository, ItemIdPage};
pub use postgres::{PoolSettings, PostgresDatabase};
pub use repositories::catalog::PostgresCatalogRepository;
