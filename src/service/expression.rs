//! The expression backend.
//!
//! A path is compiled once with the `path` grammar rule and the result is
//! kept per path text. Evaluation walks the compiled segments and hands each
//! one to the first [`PropertyAccessor`] that claims the current target.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::ds::cache::{AccessorCache, LookupCache};
use crate::ds::error::{Direction, PropertyError};
use crate::ds::value::Value;
use crate::parser::ast::{CompiledPath, Segment};
use crate::parser::parse_path;
use crate::service::config::{ServiceConfig, EXPRESSION_BACKEND};
use crate::service::resolver::BeanResolver;
use crate::service::types::PropertyService;

/// Reads and writes one property on the kinds of target it claims.
pub trait PropertyAccessor: Send + Sync {
    fn can_read(&self, target: &Value, name: &str) -> bool;

    fn read(
        &self,
        target: &Value,
        name: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError>;

    fn can_write(&self, target: &Value, name: &str) -> bool;

    fn write(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError>;

    /// Drop any cached state.
    fn clear(&self) {}

    fn name(&self) -> &str;
}

impl<A: PropertyAccessor + ?Sized> PropertyAccessor for Arc<A> {
    fn can_read(&self, target: &Value, name: &str) -> bool {
        (**self).can_read(target, name)
    }

    fn read(
        &self,
        target: &Value,
        name: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        (**self).read(target, name, local)
    }

    fn can_write(&self, target: &Value, name: &str) -> bool {
        (**self).can_write(target, name)
    }

    fn write(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError> {
        (**self).write(target, name, value)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Map entries. Absent keys read as `Null`, writes always insert.
pub struct MapAccessor;

impl PropertyAccessor for MapAccessor {
    fn can_read(&self, target: &Value, _name: &str) -> bool {
        target.as_map().is_some()
    }

    fn read(
        &self,
        target: &Value,
        name: &str,
        _local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        Ok(target.as_map().and_then(|m| m.get(name)).unwrap_or(Value::Null))
    }

    fn can_write(&self, target: &Value, _name: &str) -> bool {
        target.as_map().is_some()
    }

    fn write(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError> {
        match target.as_map() {
            Some(map) => {
                map.insert(name, value);
                Ok(())
            }
            None => Err(PropertyError::not_found(target.type_name(), name, Direction::Write)),
        }
    }

    fn name(&self) -> &str {
        "map"
    }
}

/// Bean properties, resolved through a [`BeanResolver`].
pub struct ReflectiveAccessor {
    resolver: BeanResolver,
}

impl ReflectiveAccessor {
    pub fn new(resolver: BeanResolver) -> Self {
        ReflectiveAccessor { resolver }
    }

    pub fn cache(&self) -> &AccessorCache {
        self.resolver.cache()
    }
}

impl PropertyAccessor for ReflectiveAccessor {
    fn can_read(&self, target: &Value, _name: &str) -> bool {
        target.as_object().is_some()
    }

    fn read(
        &self,
        target: &Value,
        name: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        match target.as_object() {
            Some(obj) => self.resolver.read(obj, name, local),
            None => Err(PropertyError::not_found(target.type_name(), name, Direction::Read)),
        }
    }

    fn can_write(&self, target: &Value, _name: &str) -> bool {
        target.as_object().is_some()
    }

    fn write(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError> {
        match target.as_object() {
            Some(obj) => self.resolver.write(obj, name, value),
            None => Err(PropertyError::not_found(target.type_name(), name, Direction::Write)),
        }
    }

    fn clear(&self) {
        self.resolver.clear();
    }

    fn name(&self) -> &str {
        "reflective"
    }
}

pub struct ExpressionPropertyService {
    expressions: DashMap<String, Arc<CompiledPath>>,
    accessors: Vec<Box<dyn PropertyAccessor>>,
    reflective: Arc<ReflectiveAccessor>,
}

impl ExpressionPropertyService {
    pub fn new() -> Self {
        Self::with_config(&ServiceConfig::default())
    }

    pub fn with_config(config: &ServiceConfig) -> Self {
        let reflective = Arc::new(ReflectiveAccessor::new(BeanResolver::from_config(config)));
        ExpressionPropertyService {
            expressions: DashMap::new(),
            accessors: vec![Box::new(MapAccessor), Box::new(reflective.clone())],
            reflective,
        }
    }

    /// Accessors consulted after the built-in map and bean accessors.
    pub fn add_accessor(&mut self, accessor: Box<dyn PropertyAccessor>) {
        self.accessors.push(accessor);
    }

    /// Accessor cache of the bean accessor.
    pub fn cache(&self) -> &AccessorCache {
        self.reflective.cache()
    }

    /// Number of compiled paths currently kept.
    pub fn compiled_len(&self) -> usize {
        self.expressions.len()
    }

    /// Compile `path`, reusing an earlier compilation of the same text.
    pub fn compile(&self, path: &str) -> Result<Arc<CompiledPath>, PropertyError> {
        let path = path.trim();
        if let Some(compiled) = self.expressions.get(path) {
            trace!(path, "compiled path cache hit");
            return Ok(compiled.value().clone());
        }
        let compiled = Arc::new(parse_path(path)?);
        debug!(path, segments = compiled.len(), "compiled path");
        self.expressions.insert(path.to_string(), compiled.clone());
        Ok(compiled)
    }

    fn read_segment(
        &self,
        target: &Value,
        name: &str,
        local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        match self.accessors.iter().find(|a| a.can_read(target, name)) {
            Some(accessor) => accessor.read(target, name, local),
            None => Err(PropertyError::not_found(target.type_name(), name, Direction::Read)),
        }
    }

    fn write_segment(&self, target: &Value, name: &str, value: Value) -> Result<(), PropertyError> {
        match self.accessors.iter().find(|a| a.can_write(target, name)) {
            Some(accessor) => accessor.write(target, name, value),
            None => Err(PropertyError::not_found(target.type_name(), name, Direction::Write)),
        }
    }

    /// If `target` is a map holding the rest of the path as one key, that
    /// entry.
    fn whole_key(target: &Value, segment: &Segment) -> Option<Value> {
        target.as_map().and_then(|m| m.get(&segment.rest))
    }

    fn evaluate(
        &self,
        target: &Value,
        path: &CompiledPath,
        mut local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        let mut current = target.clone();
        for segment in &path.segments {
            if current.is_null() {
                return Ok(Value::Null);
            }
            if let Some(value) = Self::whole_key(&current, segment) {
                return Ok(value);
            }
            current = self.read_segment(&current, &segment.name, local.as_deref_mut())?;
        }
        Ok(current)
    }

    fn assign(&self, target: &Value, path: &CompiledPath, value: Value) -> Result<(), PropertyError> {
        let (last, init) = match path.split_last() {
            Some(split) => split,
            None => return Err(PropertyError::invalid_path(&path.source, "empty path")),
        };
        let mut current = target.clone();
        for segment in init {
            if current.is_null() {
                debug!(path = %path.source, segment = %segment.name, "null intermediate, nothing written");
                return Ok(());
            }
            if let Some(map) = current.as_map() {
                if map.contains_key(&segment.rest) {
                    map.insert(segment.rest.as_str(), value);
                    return Ok(());
                }
            }
            current = self.read_segment(&current, &segment.name, None)?;
        }
        if current.is_null() {
            debug!(path = %path.source, "null intermediate, nothing written");
            return Ok(());
        }
        self.write_segment(&current, &last.name, value)
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
        let compiled = self.compile(path)?;
        self.evaluate(target, &compiled, local)
    }
}

impl Default for ExpressionPropertyService {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyService for ExpressionPropertyService {
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
        let compiled = self.compile(path)?;
        self.assign(target, &compiled, value)
    }

    fn on_destroy(&self) {
        info!(
            backend = EXPRESSION_BACKEND,
            compiled = self.expressions.len(),
            cached = self.reflective.cache().len(),
            "clearing compiled paths and accessor caches"
        );
        self.expressions.clear();
        for accessor in &self.accessors {
            accessor.clear();
        }
    }

    fn name(&self) -> &str {
        EXPRESSION_BACKEND
    }
}
