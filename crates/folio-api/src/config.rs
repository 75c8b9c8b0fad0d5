//! Layered service configuration
//!
//! Sources, later ones winning: built-in defaults, an optional `folio.toml`
//! (or an explicit file), then `FOLIO_*` environment variables with `__`
//! between nested keys (`FOLIO_SQLITE__PATH`, `FOLIO_AUTH__JWT_SECRET`).
//! A `.env` file in the working directory is loaded into the environment
//! first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment as EnvSource, File, FileFormat};
use folio_core::logging_facility::Profile;
use folio_core_types::Sensitive;
use folio_store::{FallbackMode, RemoteKvConfig};
use serde::Deserialize;
use thiserror::Error;

/// Signing secret used when none is configured; refused in production
pub const DEFAULT_JWT_SECRET: &str = "folio-development-secret";

pub const DEFAULT_PORT: u16 = 3169;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Remote,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSettings {
    /// PATCH endpoint for writes
    #[serde(default)]
    pub url: Option<String>,
    /// Base URL for reads; defaults to `url`
    #[serde(default)]
    pub read_url: Option<String>,
    pub token: Sensitive<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Local mirror of the remote store; no mirror when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: Sensitive<String>,
    pub token_ttl_hours: u32,
    /// Static key accepted in `x-api-key` on admin routes
    #[serde(default)]
    pub admin_api_key: Option<Sensitive<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// `pretty` or `json`; follows `environment` when unset
    #[serde(default)]
    pub log_format: Option<String>,
    pub backend: BackendKind,
    pub sqlite: SqliteSettings,
    pub remote: RemoteSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub auth: AuthSettings,
    pub cors: CorsSettings,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("environment", "development")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("backend", "sqlite")?
        .set_default("sqlite.path", "data/folio.db")?
        .set_default("remote.token", "")?
        .set_default("remote.timeout_secs", 10)?
        .set_default("auth.jwt_secret", DEFAULT_JWT_SECRET)?
        .set_default("auth.token_ttl_hours", 24)?
        .set_default("cors.allowed_origins", Vec::<String>::new())?)
}

fn env_source() -> EnvSource {
    EnvSource::with_prefix("FOLIO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}

impl FolioConfig {
    /// Load from defaults, a config file and the environment
    ///
    /// With `file = None`, `folio.toml` in the working directory is used if
    /// present. An explicit file must exist.
    ///
    /// # Errors
    ///
    /// `Load` when a source cannot be read or a value has the wrong type,
    /// `Invalid` when the combination fails [`FolioConfig::validate`].
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("folio").required(false),
        };

        Self::build(defaults()?.add_source(file_source).add_source(env_source()))
    }

    /// Defaults overlaid with a TOML document; the environment is ignored
    ///
    /// # Errors
    ///
    /// As for [`FolioConfig::load`].
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::build(defaults()?.add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot work together
    ///
    /// # Errors
    ///
    /// `Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == BackendKind::Remote {
            let url_missing = self.remote.url.as_deref().map_or(true, |u| u.trim().is_empty());
            if url_missing {
                return Err(ConfigError::Invalid(
                    "remote.url is required when backend = \"remote\"".to_string(),
                ));
            }
            if self.remote.token.expose().is_empty() {
                return Err(ConfigError::Invalid(
                    "remote.token is required when backend = \"remote\"".to_string(),
                ));
            }
        }

        if self.auth.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_hours must be at least 1".to_string(),
            ));
        }

        if self.environment == Environment::Production {
            let secret = self.auth.jwt_secret.expose();
            if secret == DEFAULT_JWT_SECRET || secret.len() < 16 {
                return Err(ConfigError::Invalid(
                    "auth.jwt_secret must be set to a value of at least 16 characters in production"
                        .to_string(),
                ));
            }
        }

        if let Some(format) = &self.log_format {
            format
                .parse::<Profile>()
                .map_err(|e| ConfigError::Invalid(format!("log_format: {}", e)))?;
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn logging_profile(&self) -> Profile {
        match self.log_format.as_deref().map(str::parse::<Profile>) {
            Some(Ok(profile)) => profile,
            _ => match self.environment {
                Environment::Development => Profile::Development,
                Environment::Production => Profile::Production,
            },
        }
    }

    pub fn fallback_mode(&self) -> FallbackMode {
        match self.environment {
            Environment::Development => FallbackMode::Development,
            Environment::Production => FallbackMode::Production,
        }
    }

    /// Remote store connection settings, if a write URL is configured
    pub fn remote_kv(&self) -> Option<RemoteKvConfig> {
        let write_url = self.remote.url.clone()?;
        let read_url = self.remote.read_url.clone().unwrap_or_else(|| write_url.clone());
        Some(RemoteKvConfig {
            write_url,
            read_url,
            token: self.remote.token.clone(),
            timeout: Duration::from_secs(self.remote.timeout_secs),
        })
    }
}
