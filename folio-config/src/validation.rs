use axum::http::{Method, header::HeaderName};
use thiserror::Error;

use super::models::{CatalogConfig, Config, CorsConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("invalid catalog setting {field}: {reason}")]
    InvalidCatalogSetting { field: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;
    validate_catalog(&config.catalog)?;

    if config.database.primary_url.is_none() {
        warnings.push_with_hint(
            "No database URL configured; the server cannot reach the catalog store",
            "Set DATABASE_URL, DATABASE_URL_FILE, or DATABASE_HOST/DATABASE_USER/DATABASE_NAME",
        );
    }

    if config.cors.allow_credentials && config.cors.is_wildcard_included() {
        warnings.push(
            "CORS credentials allowed alongside wildcard origin; browsers will reject such configuration",
        );
    }

    Ok(warnings)
}

fn validate_catalog(
    catalog: &CatalogConfig,
) -> Result<(), ConfigGuardRailError> {
    if catalog.default_language_id < 1 {
        return Err(ConfigGuardRailError::InvalidCatalogSetting {
            field: "DEFAULT_LANGUAGE_ID",
            reason: format!(
                "must be at least 1, got {}",
                catalog.default_language_id
            ),
        });
    }

    if catalog.new_arrival_days < 1 {
        return Err(ConfigGuardRailError::InvalidCatalogSetting {
            field: "NEW_ARRIVAL_DAYS",
            reason: format!(
                "must be at least 1, got {}",
                catalog.new_arrival_days
            ),
        });
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_METHODS must include at least one HTTP method"
                    .into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"
                ),
            }
        })?;
    }

    if cors.allowed_headers.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_HEADERS must include at least one header name"
                    .into(),
        });
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid header name `{header}` in CORS_ALLOWED_HEADERS"
                ),
            }
        })?;
    }

    Ok(())
}
