pub mod resolve;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::core::package::NodeClass;
use crate::query::dpkg::DEFAULT_QUERY_TOOL;

pub const DEFAULT_RENDER_TOOL: &str = "dot";
pub const DEFAULT_FORMAT: &str = "dot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_query_tool")]
    pub tool: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            tool: default_query_tool(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_render_tool")]
    pub tool: String,
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tool: default_render_tool(),
            format: default_format(),
        }
    }
}

/// Graphviz fill colors for the three node classes.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_installed_color")]
    pub installed: String,
    #[serde(default = "default_not_installed_color")]
    pub not_installed: String,
    #[serde(default = "default_invalid_color")]
    pub invalid: String,
}

impl ColorConfig {
    pub fn for_class(&self, class: NodeClass) -> &str {
        match class {
            NodeClass::Installed => &self.installed,
            NodeClass::NotInstalled => &self.not_installed,
            NodeClass::Invalid => &self.invalid,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            installed: default_installed_color(),
            not_installed: default_not_installed_color(),
            invalid: default_invalid_color(),
        }
    }
}

fn default_query_tool() -> String {
    DEFAULT_QUERY_TOOL.to_string()
}

fn default_render_tool() -> String {
    DEFAULT_RENDER_TOOL.to_string()
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_installed_color() -> String {
    "palegreen".to_string()
}

fn default_not_installed_color() -> String {
    "lightgrey".to_string()
}

fn default_invalid_color() -> String {
    "salmon".to_string()
}
