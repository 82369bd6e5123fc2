//! Registry of property service backends.

use std::collections::HashMap;

use tracing::info;

use super::config::{ConfigError, ServiceConfig, EXPRESSION_BACKEND, REFLECT_BACKEND};
use super::expression::ExpressionPropertyService;
use super::reflect::ReflectPropertyService;
use super::types::PropertyService;

/// Builds a backend from its configuration.
pub type ServiceFactory = fn(&ServiceConfig) -> Box<dyn PropertyService>;

/// Registry mapping backend names to factories.
pub struct ServiceRegistry {
    factories: HashMap<String, ServiceFactory>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ServiceRegistry {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the `reflect` and `expression` backends.
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        registry.register(REFLECT_BACKEND, |config| {
            Box::new(ReflectPropertyService::with_config(config))
        });
        registry.register(EXPRESSION_BACKEND, |config| {
            Box::new(ExpressionPropertyService::with_config(config))
        });
        registry
    }

    /// Register a backend, replacing any earlier one of the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: ServiceFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered backend names, sorted.
    pub fn backend_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Build the backend named by `config.backend`.
    pub fn create(&self, config: &ServiceConfig) -> Result<Box<dyn PropertyService>, ConfigError> {
        let factory = self
            .factories
            .get(&config.backend)
            .ok_or_else(|| ConfigError::UnknownBackend(config.backend.clone()))?;
        let service = factory(config);
        info!(
            backend = service.name(),
            negative_cache = config.negative_cache,
            "created property service"
        );
        Ok(service)
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}
