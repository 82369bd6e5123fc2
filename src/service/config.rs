//! Property service configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::util::{GET_GETTER, IS_GETTER, SETTER};

pub const REFLECT_BACKEND: &str = "reflect";
pub const EXPRESSION_BACKEND: &str = "expression";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown property service backend '{0}'")]
    UnknownBackend(String),
}

/// Settings of a property service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Registered backend name.
    pub backend: String,
    /// Getter prefixes, tried in order (`name` -> `getName`, `isName`).
    pub getter_prefixes: Vec<String>,
    /// Setter prefix (`name` -> `setName`).
    pub setter_prefix: String,
    /// Remember failed resolutions.
    pub negative_cache: bool,
}

impl ServiceConfig {
    pub fn new() -> Self {
        ServiceConfig {
            backend: REFLECT_BACKEND.to_string(),
            getter_prefixes: vec![GET_GETTER.to_string(), IS_GETTER.to_string()],
            setter_prefix: SETTER.to_string(),
            negative_cache: true,
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// [property_service]
    /// backend = "expression"
    /// getter_prefixes = ["get", "is"]
    /// setter_prefix = "set"
    /// negative_cache = true
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.property_service)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    property_service: ServiceConfig,
}
