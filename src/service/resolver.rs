//! Cache-then-resolve access to a single property of a bean.
//!
//! ```text
//! read "name" on Parent
//!      ↓
//! 1. call-scoped cache  → hit? invoke
//! 2. shared cache       → hit? invoke (a failure is reported, not retried)
//! 3. negative cache     → known missing? PropertyNotFound
//! 4. strategy chain     → invoke each candidate in order, cache the first
//!                         that succeeds; all failed? report the first failure
//! 5. no candidates      → remember the miss, PropertyNotFound
//! ```

use tracing::{debug, trace, warn};

use crate::ds::cache::{Accessor, AccessorCache, CacheKey, LookupCache};
use crate::ds::class::Class;
use crate::ds::error::{InvocationError, PropertyError};
use crate::ds::value::{ObjectRef, Value};
use crate::service::config::ServiceConfig;
use crate::service::strategy::StrategyChain;

/// Where an accessor came from.
enum Found {
    Cached(Accessor),
    /// Fresh from the strategy chain, never empty.
    Candidates(Vec<Accessor>),
}

/// Resolves and caches accessors for bean properties.
pub struct BeanResolver {
    cache: AccessorCache,
    strategies: StrategyChain,
}

impl BeanResolver {
    pub fn new(cache: AccessorCache, strategies: StrategyChain) -> Self {
        BeanResolver { cache, strategies }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            AccessorCache::with_negative_cache(config.negative_cache),
            StrategyChain::from_config(config),
        )
    }

    pub fn cache(&self) -> &AccessorCache {
        &self.cache
    }

    fn find(
        &self,
        class: &Class,
        key: &CacheKey,
        local: Option<&mut LookupCache>,
    ) -> Result<Found, PropertyError> {
        if let Some(accessor) = local.as_ref().and_then(|l| l.get(key)) {
            trace!(key = %key, "call-scoped cache hit");
            return Ok(Found::Cached(accessor.clone()));
        }
        if let Some(accessor) = self.cache.get(key) {
            trace!(key = %key, "accessor cache hit");
            if let Some(local) = local {
                local.insert(key.clone(), accessor.clone());
            }
            return Ok(Found::Cached(accessor));
        }
        let not_found = || PropertyError::not_found(class.name(), key.property(), key.direction());
        if self.cache.is_missing(key) {
            trace!(key = %key, "negative cache hit");
            return Err(not_found());
        }
        let candidates = self.strategies.candidates(class, key.property(), key.direction());
        if candidates.is_empty() {
            debug!(key = %key, "no {} found", key.direction());
            self.cache.mark_missing(key.clone());
            return Err(not_found());
        }
        Ok(Found::Candidates(candidates))
    }

    /// Read `property` from the bean behind `obj`.
    pub fn read(
        &self,
        obj: &ObjectRef,
        property: &str,
        mut local: Option<&mut LookupCache>,
    ) -> Result<Value, PropertyError> {
        let bean = obj.read();
        let class = bean.class();
        let key = CacheKey::read(class, property);

        let candidates = match self.find(class, &key, local.as_deref_mut())? {
            Found::Cached(accessor) => {
                return accessor.get(&*bean).map_err(|e| {
                    warn!(key = %key, member = %accessor.member(), error = %e, "cached getter failed");
                    PropertyError::invocation(class.name(), property, e)
                })
            }
            Found::Candidates(candidates) => candidates,
        };

        let mut failure: Option<InvocationError> = None;
        for accessor in candidates {
            match accessor.get(&*bean) {
                Ok(value) => {
                    debug!(key = %key, member = %accessor.member(), "caching getter");
                    if let Some(local) = local {
                        local.insert(key.clone(), accessor.clone());
                    }
                    self.cache.put(key, accessor);
                    return Ok(value);
                }
                Err(e) => {
                    debug!(key = %key, member = %accessor.member(), error = %e, "getter failed, trying next");
                    failure.get_or_insert(e);
                }
            }
        }
        Err(Self::exhausted(class, &key, failure))
    }

    /// Write `value` to `property` of the bean behind `obj`.
    pub fn write(&self, obj: &ObjectRef, property: &str, value: Value) -> Result<(), PropertyError> {
        let mut bean = obj.write();
        let class = bean.class();
        let key = CacheKey::write(class, property);

        let candidates = match self.find(class, &key, None)? {
            Found::Cached(accessor) => {
                return accessor.set(&mut *bean, value).map_err(|e| {
                    warn!(key = %key, member = %accessor.member(), error = %e, "cached setter failed");
                    PropertyError::invocation(class.name(), property, e)
                })
            }
            Found::Candidates(candidates) => candidates,
        };

        let mut failure: Option<InvocationError> = None;
        for accessor in candidates {
            match accessor.set(&mut *bean, value.clone()) {
                Ok(()) => {
                    debug!(key = %key, member = %accessor.member(), "caching setter");
                    self.cache.put(key, accessor);
                    return Ok(());
                }
                Err(e) => {
                    debug!(key = %key, member = %accessor.member(), error = %e, "setter failed, trying next");
                    failure.get_or_insert(e);
                }
            }
        }
        Err(Self::exhausted(class, &key, failure))
    }

    /// Every candidate failed: report the first failure. Neither cache is
    /// touched, so the next call resolves again.
    fn exhausted(class: &Class, key: &CacheKey, failure: Option<InvocationError>) -> PropertyError {
        match failure {
            Some(e) => PropertyError::invocation(class.name(), key.property(), e),
            None => PropertyError::not_found(class.name(), key.property(), key.direction()),
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
