use thiserror::Error;

use crate::config::ConfigError;
use crate::core::depends::InvalidDependencyName;

#[derive(Debug, Error)]
pub enum DebgraphError {
    #[error("invalid dependency declaration for {package}: {source}")]
    InvalidDependencyName {
        package: String,
        #[source]
        source: InvalidDependencyName,
    },
    #[error("package {0} is already registered")]
    RegistryConflict(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render with {tool} failed: {message}")]
    Render { tool: String, message: String },
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DebgraphError>;
