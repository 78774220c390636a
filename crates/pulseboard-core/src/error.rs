//! Error types for catalog construction and configuration loading.

use thiserror::Error;

/// Errors raised while building a [`crate::MetricCatalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("metric id must not be empty")]
    EmptyId,

    #[error("duplicate metric id: {0}")]
    DuplicateId(String),
}

/// Errors raised while loading a [`crate::DashboardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid metric catalog: {0}")]
    Catalog(#[from] CatalogError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
