//! Errors raised outside the rating core: storage, configuration and the
//! service layer that glues them to the core.

use std::path::PathBuf;
use thiserror::Error;

use league_core::LeagueError;

pub type StoreResult<T> = Result<T, StoreError>;
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse league file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("store has no {0}")]
    Missing(String),

    #[error("store already has {0}")]
    Duplicate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    League(#[from] LeagueError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<league_core::ValidationError> for ServiceError {
    fn from(err: league_core::ValidationError) -> Self {
        Self::League(err.into())
    }
}
