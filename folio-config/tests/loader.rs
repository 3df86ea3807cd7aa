use std::{
    ffi::OsString,
    fs,
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use folio_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};
use once_cell::sync::Lazy;
use tempfile::TempDir;

static SERIAL: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn serial_guard() -> std::sync::MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

const MANAGED_VARS: &[&str] = &[
    "FOLIO_CONFIG_PATH",
    "SERVER_HOST",
    "SERVER_PORT",
    "DATABASE_URL",
    "DATABASE_URL_FILE",
    "DATABASE_HOST",
    "DATABASE_PORT",
    "DATABASE_USER",
    "DATABASE_NAME",
    "DATABASE_PASSWORD",
    "DATABASE_PASSWORD_FILE",
    "DB_MAX_CONNECTIONS",
    "DB_MIN_CONNECTIONS",
    "DB_ACQUIRE_TIMEOUT",
    "IMAGE_BASE_URL",
    "DEFAULT_LANGUAGE_ID",
    "NEW_ARRIVAL_DAYS",
    "CORS_ALLOWED_ORIGINS",
    "CORS_ALLOWED_METHODS",
    "CORS_ALLOWED_HEADERS",
    "CORS_ALLOW_CREDENTIALS",
    "DEV_MODE",
];

struct EnvVarGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvVarGuard {
    fn unset(key: &'static str) -> Self {
        let previous = std::env::var_os(key);
        // SAFETY: tests are serialized and restore previous environment
        // state on drop.
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, previous }
    }

    fn set(key: &'static str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let previous = std::env::var_os(key);
        // SAFETY: tests are serialized and restore previous environment
        // state on drop.
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: we reinstate the environment variable to its prior state.
        unsafe {
            match &self.previous {
                Some(prev) => std::env::set_var(self.key, prev),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

/// Clears every variable the loader reads and points it at an empty temp
/// directory for `.env` lookups.
struct Sandbox {
    dir: TempDir,
    _cleared: Vec<EnvVarGuard>,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            _cleared: MANAGED_VARS
                .iter()
                .copied()
                .map(EnvVarGuard::unset)
                .collect(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn loader(&self) -> ConfigLoader {
        ConfigLoader::new().with_env_file(self.path("missing.env"))
    }
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();

    let load = sandbox.loader().load().expect("config loads");
    let config = load.config;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.database.primary_url, None);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.database.min_connections, 1);
    assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
    assert_eq!(config.catalog.image_base_url, "/image/catalog/");
    assert_eq!(config.catalog.default_language_id, 1);
    assert_eq!(config.catalog.new_arrival_days, 30);
    assert!(!config.dev_mode);
    assert!(!config.metadata.env_file_loaded);

    let messages: Vec<&str> = load
        .warnings
        .iter()
        .map(|w| w.message.as_str())
        .collect();
    assert!(messages.iter().any(|m| m.contains("folio.toml")));
    assert!(messages.iter().any(|m| m.contains("database URL")));
}

#[test]
fn environment_overrides_file_values() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let config_path = sandbox.write(
        "folio.toml",
        r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
url = "postgresql://folio@db.internal:5432/catalog"
max_connections = 4
acquire_timeout = "5s"

[catalog]
image_base_url = "https://cdn.example.com/catalog"
new_arrival_days = 14
"#,
    );
    let _port = EnvVarGuard::set("SERVER_PORT", "9100");
    let _days = EnvVarGuard::set("NEW_ARRIVAL_DAYS", "7");

    let load = sandbox
        .loader()
        .with_config_path(&config_path)
        .load()
        .expect("config loads");
    let config = load.config;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9100);
    assert_eq!(
        config.database.primary_url.as_deref(),
        Some("postgresql://folio@db.internal:5432/catalog")
    );
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.database.acquire_timeout, Duration::from_secs(5));
    assert_eq!(
        config.catalog.image_base_url,
        "https://cdn.example.com/catalog/"
    );
    assert_eq!(config.catalog.new_arrival_days, 7);
    assert_eq!(config.metadata.config_path, Some(config_path));
    assert!(load.warnings.is_empty());
}

#[test]
fn database_url_is_assembled_from_parts() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let password_file = sandbox.write("db_password", "s3cret\n");
    let _host = EnvVarGuard::set("DATABASE_HOST", "db");
    let _user = EnvVarGuard::set("DATABASE_USER", "folio");
    let _name = EnvVarGuard::set("DATABASE_NAME", "catalog");
    let _port = EnvVarGuard::set("DATABASE_PORT", "6543");
    let _password = EnvVarGuard::set("DATABASE_PASSWORD_FILE", &password_file);

    let config = sandbox.loader().load().expect("config loads").config;

    assert_eq!(
        config.database.primary_url.as_deref(),
        Some("postgresql://folio:s3cret@db:6543/catalog")
    );
}

#[test]
fn database_url_env_wins_over_parts() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let _url = EnvVarGuard::set(
        "DATABASE_URL",
        "postgresql://direct@localhost/folio",
    );
    let _host = EnvVarGuard::set("DATABASE_HOST", "ignored");
    let _user = EnvVarGuard::set("DATABASE_USER", "ignored");
    let _name = EnvVarGuard::set("DATABASE_NAME", "ignored");

    let config = sandbox.loader().load().expect("config loads").config;

    assert_eq!(
        config.database.primary_url.as_deref(),
        Some("postgresql://direct@localhost/folio")
    );
}

#[test]
fn env_file_values_are_loaded() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let env_file =
        sandbox.write(".env", "DEFAULT_LANGUAGE_ID=2\nDEV_MODE=true\n");

    let load = ConfigLoader::new()
        .with_env_file(&env_file)
        .load()
        .expect("config loads");

    assert!(load.config.metadata.env_file_loaded);
    assert_eq!(load.config.catalog.default_language_id, 2);
    assert!(load.config.dev_mode);
}

#[test]
fn explicit_config_path_must_exist() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();

    let err = sandbox
        .loader()
        .with_config_path(sandbox.path("nope.toml"))
        .load()
        .expect_err("missing explicit config");

    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn config_path_from_env_is_honoured() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let config_path = sandbox.write("custom.toml", "[server]\nport = 8111\n");
    let _path = EnvVarGuard::set("FOLIO_CONFIG_PATH", &config_path);

    let config = sandbox.loader().load().expect("config loads").config;

    assert_eq!(config.server.port, 8111);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let config_path = sandbox.write("broken.toml", "[server\nport = ");

    let err = sandbox
        .loader()
        .with_config_path(&config_path)
        .load()
        .expect_err("broken config");

    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn invalid_acquire_timeout_is_rejected() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let _timeout = EnvVarGuard::set("DB_ACQUIRE_TIMEOUT", "soon");

    let err = sandbox.loader().load().expect_err("bad duration");

    assert!(matches!(
        err,
        ConfigLoadError::InvalidDuration {
            field: "DB_ACQUIRE_TIMEOUT",
            ..
        }
    ));
}

#[test]
fn wildcard_cors_outside_dev_mode_fails() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let _origins = EnvVarGuard::set("CORS_ALLOWED_ORIGINS", "*");

    let err = sandbox.loader().load().expect_err("wildcard rejected");
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::DangerousCorsWildcard)
    ));

    let _dev = EnvVarGuard::set("DEV_MODE", "1");
    assert!(sandbox.loader().load().is_ok());
}

#[test]
fn non_positive_language_id_fails() {
    let _serial = serial_guard();
    let sandbox = Sandbox::new();
    let _language = EnvVarGuard::set("DEFAULT_LANGUAGE_ID", "0");

    let err = sandbox.loader().load().expect_err("language rejected");
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(
            ConfigGuardRailError::InvalidCatalogSetting { .. }
        )
    ));
}
