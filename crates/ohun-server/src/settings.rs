//! Layered gateway settings: optional TOML file, then `OHUN__*` environment

use config::{Config, ConfigError, Environment, File};
use ohun_core::{ServerConfig, ServiceConfig};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServiceConfig,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    pub fn load_from(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("OHUN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// `$OHUN_CONFIG`, else `<config dir>/ohun/config.toml`
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os("OHUN_CONFIG")
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("ohun").join("config.toml")))
}
