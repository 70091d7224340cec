use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pipenet_core::{PipenetError, PipenetResult};

const DEFAULT_CONFIG_NAME: &str = "pipenet.json";
const DEFAULT_MAX_TAKE: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    Sqlite { path: Option<String> },
    Postgres { url: String },
    Mysql { url: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PoolConfig {
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub acquire_timeout_ms: Option<u64>,
    pub idle_timeout_ms: Option<u64>,
}

/// Per-request limits applied by the navigation and flow paths.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    pub max_take: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl QueryConfig {
    pub fn with_defaults() -> Self {
        Self {
            max_take: Some(DEFAULT_MAX_TAKE),
            request_timeout_ms: Some(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Clamps a requested page size to `max_take`, if one is configured.
    pub fn clamp_take(&self, take: u64) -> u64 {
        match self.max_take {
            Some(limit) if take > limit => {
                log::warn!("page size {take} exceeds max_take {limit}; clamping");
                limit
            }
            _ => take,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PipenetConfig {
    pub database: DatabaseConfig,
    pub pool: Option<PoolConfig>,
    pub query: Option<QueryConfig>,
}

impl PipenetConfig {
    pub fn default_sqlite(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig::Sqlite {
                path: Some(path.into()),
            },
            pool: None,
            query: Some(QueryConfig::with_defaults()),
        }
    }

    pub fn load_or_init(base_dir: &Path, default_sqlite_path: &Path) -> PipenetResult<Self> {
        fs::create_dir_all(base_dir)
            .map_err(|err| PipenetError::storage(format!("create config dir: {err}")))?;
        let config_path = base_dir.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|err| PipenetError::storage(format!("read config: {err}")))?;
            let config: PipenetConfig = serde_json::from_str(&raw)
                .map_err(|err| PipenetError::validation(format!("parse config: {err}")))?;
            return Ok(config);
        }
        let default = PipenetConfig::default_sqlite(default_sqlite_path.to_string_lossy());
        let payload = serde_json::to_string_pretty(&default)
            .map_err(|err| PipenetError::storage(format!("serialize config: {err}")))?;
        fs::write(&config_path, payload)
            .map_err(|err| PipenetError::storage(format!("write config: {err}")))?;
        Ok(default)
    }

    pub fn sqlite_path(&self, base_dir: &Path) -> PipenetResult<PathBuf> {
        match &self.database {
            DatabaseConfig::Sqlite { path } => {
                let path = path.clone().unwrap_or_else(|| "pipenet.sqlite".to_string());
                let candidate = PathBuf::from(path);
                if candidate.is_absolute() {
                    Ok(candidate)
                } else {
                    Ok(base_dir.join(candidate))
                }
            }
            _ => Err(PipenetError::validation("config is not sqlite backend")),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.database {
            DatabaseConfig::Sqlite { .. } => "sqlite",
            DatabaseConfig::Postgres { .. } => "postgres",
            DatabaseConfig::Mysql { .. } => "mysql",
        }
    }

    pub fn connection_url(&self) -> Option<&str> {
        match &self.database {
            DatabaseConfig::Sqlite { .. } => None,
            DatabaseConfig::Postgres { url } | DatabaseConfig::Mysql { url } => Some(url.as_str()),
        }
    }

    pub fn query_limits(&self) -> QueryConfig {
        self.query.clone().unwrap_or_else(QueryConfig::with_defaults)
    }
}
