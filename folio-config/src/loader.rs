use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{
    models::{
        CatalogConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
        ServerConfig,
        sources::{EnvConfig, FileConfig, FileDatabaseConfig},
    },
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IMAGE_BASE_URL: &str = "/image/catalog/";
pub const DEFAULT_LANGUAGE_ID: i32 = 1;
pub const DEFAULT_NEW_ARRIVAL_DAYS: i64 = 30;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("folio.toml"),
        PathBuf::from("config/folio.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = self.compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        } else {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        debug!(
            path = %path.display(),
            ?provenance,
            "loaded configuration file"
        );
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No folio.toml detected; falling back to environment variables",
                "Create folio.toml or point FOLIO_CONFIG_PATH / --config at one",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            catalog: file_catalog,
            cors: file_cors,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let acquire_timeout = match (
            env.db_acquire_timeout.as_deref(),
            file_database.acquire_timeout.as_deref(),
        ) {
            (Some(raw), _) => parse_duration("DB_ACQUIRE_TIMEOUT", raw)?,
            (None, Some(raw)) => {
                parse_duration("database.acquire_timeout", raw)?
            }
            (None, None) => DEFAULT_ACQUIRE_TIMEOUT,
        };

        let database = DatabaseConfig {
            primary_url: self.resolve_database_url(&env, &file_database)?,
            max_connections: env
                .db_max_connections
                .or(file_database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            min_connections: env
                .db_min_connections
                .or(file_database.min_connections)
                .unwrap_or(DEFAULT_MIN_CONNECTIONS),
            acquire_timeout,
        };

        let mut image_base_url = env
            .image_base_url
            .clone()
            .or(file_catalog.image_base_url)
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());
        if !image_base_url.ends_with('/') {
            image_base_url.push('/');
        }
        let catalog = CatalogConfig {
            image_base_url,
            default_language_id: env
                .default_language_id
                .or(file_catalog.default_language_id)
                .unwrap_or(DEFAULT_LANGUAGE_ID),
            new_arrival_days: env
                .new_arrival_days
                .or(file_catalog.new_arrival_days)
                .unwrap_or(DEFAULT_NEW_ARRIVAL_DAYS),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .clone()
                .or(file_cors.allowed_origins)
                .unwrap_or_else(default_cors_origins),
            allowed_methods: env
                .cors_allowed_methods
                .clone()
                .or(file_cors.allowed_methods)
                .unwrap_or_else(default_cors_methods),
            allowed_headers: env
                .cors_allowed_headers
                .clone()
                .or(file_cors.allowed_headers)
                .unwrap_or_else(default_cors_headers),
            allow_credentials: env
                .cors_allow_credentials
                .or(file_cors.allow_credentials)
                .unwrap_or(false),
        };

        let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

        let config = Config {
            server,
            database,
            catalog,
            cors,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }

    fn resolve_database_url(
        &self,
        env: &EnvConfig,
        file_database: &FileDatabaseConfig,
    ) -> Result<Option<String>, ConfigLoadError> {
        if let Some(url) = env
            .database_url
            .clone()
            .filter(|value| !value.trim().is_empty())
        {
            return Ok(Some(url));
        }

        if let Some(path) = env.database_url_file.as_ref()
            && let Some(url) = Self::read_secret_file(path)?
        {
            return Ok(Some(url));
        }

        if let Some(ref stored_url) = file_database.url {
            let trimmed = stored_url.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let mut parsed = Url::parse(trimmed).map_err(|source| {
                ConfigLoadError::InvalidDatabaseUrl { source }
            })?;
            if parsed.password().is_none()
                && let Some(password) =
                    self.resolve_database_password(env, file_database)?
            {
                parsed
                    .set_password(Some(&password))
                    .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
            }
            return Ok(Some(parsed.to_string()));
        }

        let host = env
            .database_host
            .clone()
            .filter(|value| !value.trim().is_empty());
        let user = env
            .database_user
            .clone()
            .filter(|value| !value.trim().is_empty());
        let name = env
            .database_name
            .clone()
            .filter(|value| !value.trim().is_empty());

        if let (Some(host), Some(user), Some(name)) = (host, user, name) {
            let port = env.database_port.unwrap_or(5432);
            let mut url =
                Url::parse(&format!("postgresql://{host}:{port}/{name}"))
                    .map_err(|source| ConfigLoadError::InvalidDatabaseUrl {
                        source,
                    })?;
            url.set_username(&user).map_err(|_| {
                ConfigLoadError::InvalidDatabaseUsername {
                    username: user.clone(),
                }
            })?;
            if let Some(password) =
                self.resolve_database_password(env, file_database)?
            {
                url.set_password(Some(&password))
                    .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
            }
            return Ok(Some(url.to_string()));
        }

        Ok(None)
    }

    fn resolve_database_password(
        &self,
        env: &EnvConfig,
        file_database: &FileDatabaseConfig,
    ) -> Result<Option<String>, ConfigLoadError> {
        if let Some(password) = env
            .database_password
            .clone()
            .filter(|value| !value.trim().is_empty())
        {
            return Ok(Some(password));
        }

        for path in [
            env.database_password_file.as_ref(),
            file_database.password_file.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if let Some(secret) = Self::read_secret_file(path)? {
                return Ok(Some(secret));
            }
        }

        Ok(None)
    }

    fn read_secret_file(
        path: &Path,
    ) -> Result<Option<String>, ConfigLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            ConfigLoadError::SecretFileIo {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn parse_duration(
    field: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw.trim())
        .map_err(|source| ConfigLoadError::InvalidDuration { field, source })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },
    #[error("invalid database username '{username}'")]
    InvalidDatabaseUsername { username: String },
    #[error("failed to encode database password into URL")]
    InvalidDatabasePassword,
    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid duration for {field}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "OPTIONS".to_string()]
}

fn default_cors_headers() -> Vec<String> {
    vec!["Accept".to_string(), "Content-Type".to_string()]
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
