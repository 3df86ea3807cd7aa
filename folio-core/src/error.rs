use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed or out-of-range request input.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not be reached or a query failed. The message is
    /// meant for logs only.
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CatalogError::NotFound(message.into())
    }

    /// Wrap a driver error with the operation that failed.
    pub fn store(context: &str, err: sqlx::Error) -> Self {
        CatalogError::StoreUnavailable(format!("{context}: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
