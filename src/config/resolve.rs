use std::env;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError, Result};

pub const CONFIG_ENV: &str = "DEBGRAPH_CONFIG";
pub const QUERY_TOOL_ENV: &str = "DEBGRAPH_QUERY_TOOL";
pub const RENDER_TOOL_ENV: &str = "DEBGRAPH_RENDER_TOOL";

/// Where the config came from: an explicitly named file must exist, the default one may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Default(PathBuf),
    BuiltIn,
}

pub fn resolve_config_source(config_path: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = config_path {
        return ConfigSource::Explicit(path);
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
    }

    match default_config_path() {
        Some(path) => ConfigSource::Default(path),
        None => ConfigSource::BuiltIn,
    }
}

pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = match resolve_config_source(config_path) {
        ConfigSource::Explicit(path) => load_config_file(&path)?,
        ConfigSource::Default(path) if path.is_file() => load_config_file(&path)?,
        ConfigSource::Default(_) | ConfigSource::BuiltIn => Config::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(tool) = env::var(QUERY_TOOL_ENV) {
        if !tool.is_empty() {
            config.query.tool = tool;
        }
    }
    if let Ok(tool) = env::var(RENDER_TOOL_ENV) {
        if !tool.is_empty() {
            config.render.tool = tool;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("debgraph").join("config.toml"))
}
