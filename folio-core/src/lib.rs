//! # Folio Core
//!
//! Core library for the Folio bookstore catalog: request parsing, search
//! composition, view assembly and catalog persistence.
//!
//! ## Overview
//!
//! - **Query composition**: typed search criteria parsed from raw query
//!   pairs, lowered to parameterized SQL
//! - **View assembly**: summary and detail views with derived labels,
//!   stock status and the placeholder discount
//! - **Persistence**: a [`database::CatalogRepository`] port with a
//!   PostgreSQL adapter and an in-memory adapter for tests
//!
//! ## Architecture
//!
//! - [`api`]: route templates shared by the server and its tests
//! - [`query`]: criteria, pagination and SQL builders
//! - [`catalog`]: the [`catalog::CatalogService`] used by HTTP handlers
//! - [`database`]: repository port and adapters
//! - [`error`]: the [`CatalogError`] taxonomy
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folio_core::{
//!     catalog::{CatalogService, CatalogSettings},
//!     database::InMemoryCatalog,
//!     query::SearchCriteria,
//! };
//!
//! async fn first_page() -> folio_core::Result<()> {
//!     let service = CatalogService::new(
//!         Arc::new(InMemoryCatalog::new()),
//!         CatalogSettings::default(),
//!     );
//!     let pairs = vec![("q".to_string(), "rust".to_string())];
//!     let criteria = SearchCriteria::from_query_pairs(&pairs)?;
//!     let result = service.search(&criteria).await?;
//!     println!(
//!         "{}: {} items",
//!         result.display_text, result.pagination.total_items
//!     );
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod catalog;
pub mod database;
pub mod error;
pub mod query;

pub use error::{CatalogError, Result};

/// Embedded catalog schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
