//! The reference backend: walks a path by splitting it at each step and
//! resolves every segment through the shared accessor cache.

use tracing::{debug, info};

use crate::ds::cache::{AccessorCache, LookupCache};
use crate::ds::error::{Direction, PropertyError};
use crate::ds::value::Value;
use crate::parser::util::{split_head, validate_path};
use crate::service::config::{ServiceConfig, REFLECT_BACKEND};
use crate::service::resolver::BeanResolver;
use crate::service::types::PropertyService;

pub struct ReflectPropertyService {
    resolver: BeanResolver,
}

impl ReflectPropertyService {
    pub fn new() -> Self {
        Self::with_config(&ServiceConfig::default())
    }

    pub fn with_config(config: &ServiceConfig) -> Self {
        ReflectPropertyService {
            resolver: BeanResolver::from_config(config),
        }
    }

    pub fn cache(&self) -> &AccessorCache {
        self.resolver.cache()
    }

    fn read_path(
        &self,
        target: &Value,
        path: &str,
        mut local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        if target.is_null() {
            return Ok(Value::Null);
        }
        if let Some(value) = target.as_map().and_then(|m| m.get(path)) {
            return Ok(value);
        }
        let (head, rest) = split_head(path)?;
        let value = self.read_segment(target, head, local.as_deref_mut())?;
        match rest {
            Some(rest) => self.read_path(&value, rest, local),
            None => Ok(value),
        }
    }

    fn read_segment(
        &self,
        target: &Value,
        name: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        match target {
            Value::Null => Ok(Value::Null),
            // an absent key reads as null, like a null intermediate
            Value::Map(map) => Ok(map.get(name).unwrap_or(Value::Null)),
            Value::Object(obj) => self.resolver.read(obj, name, local),
            other => Err(PropertyError::not_found(other.type_name(), name, Direction::Read)),
        }
    }

    fn write_path(&self, target: &Value, path: &str, value: Value) -> Result<(), PropertyError> {
        if target.is_null() {
            debug!(path, "null intermediate, nothing written");
            return Ok(());
        }
        if let Some(map) = target.as_map() {
            if map.contains_key(path) {
                map.insert(path, value);
                return Ok(());
            }
        }
        match split_head(path)? {
            (head, None) => self.write_segment(target, head, value),
            (head, Some(rest)) => {
                let intermediate = self.read_segment(target, head, None)?;
                self.write_path(&intermediate, rest, value)
            }
        }
    }

    fn write_segment(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError> {
        match target {
            Value::Null => Ok(()),
            Value::Map(map) => {
                map.insert(name, value);
                Ok(())
            }
            Value::Object(obj) => self.resolver.write(obj, name, value),
            other => Err(PropertyError::not_found(other.type_name(), name, Direction::Write)),
        }
    }

    fn read_root(
        &self,
        target: &Value,
        path: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        let path = path.trim();
        if let Some(value) = target.as_map().and_then(|m| m.get(path)) {
            return Ok(value);
        }
        validate_path(path)?;
        self.read_path(target, path, local)
    }
}

impl Default for ReflectPropertyService {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyService for ReflectPropertyService {
    fn read(&self, target: &Value, path: &str) -> Result<Value, PropertyError> {
        self.read_root(target, path, None)
    }

    fn read_with_cache(
        &self,
        target: &Value,
        path: &str,
        cache: &mut LookupCache,
    ) -> Result<Value, PropertyError> {
        self.read_root(target, path, Some(cache))
    }

    fn write(&self, target: &Value, path: &str, value: Value) -> Result<(), PropertyError> {
        let path = path.trim();
        if let Some(map) = target.as_map() {
            if map.contains_key(path) {
                map.insert(path, value);
                return Ok(());
            }
        }
        validate_path(path)?;
        self.write_path(target, path, value)
    }

    fn on_destroy(&self) {
        info!(
            backend = REFLECT_BACKEND,
            cached = self.resolver.cache().len(),
            "clearing accessor cache"
        );
        self.resolver.clear();
    }

    fn name(&self) -> &str {
        REFLECT_BACKEND
    }
}
