//! Configuration for the Folio catalog server.
//!
//! Values are composed from the process environment (after an optional
//! `.env`), an optional TOML file and built-in defaults, in that order of
//! precedence. The composed [`Config`] then passes through guard rails that
//! reject unsafe settings and collect non-fatal [`ConfigWarnings`].

#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
};
pub use models::{
    CatalogConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
