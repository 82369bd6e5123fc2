//! Accessor cache.
//!
//! Resolving an accessor means probing a class for prefixed methods, exact
//! methods and fields. The result depends only on the class and the property
//! name, so it is memoized per [`CacheKey`]. Failed resolutions are memoized
//! too, in a separate map that is only consulted after the positive map
//! misses.
//!
//! Entries are independent and resolution is idempotent: two threads racing
//! on the same key compute the same accessor, so plain last-write-wins
//! inserts into a [`DashMap`] are enough.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::ds::class::{Bean, Class, GetterFn, SetterFn};
use crate::ds::error::{Direction, InvocationError};
use crate::ds::value::Value;

/// Identifies an accessor: (type, property, direction).
///
/// The type name is carried for diagnostics only and takes no part in
/// equality or hashing.
#[derive(Clone)]
pub struct CacheKey {
    type_id: TypeId,
    type_name: String,
    property: String,
    direction: Direction,
}

impl CacheKey {
    pub fn new(class: &Class, property: &str, direction: Direction) -> Self {
        CacheKey {
            type_id: class.type_id(),
            type_name: class.name().to_string(),
            property: property.to_string(),
            direction,
        }
    }

    pub fn read(class: &Class, property: &str) -> Self {
        Self::new(class, property, Direction::Read)
    }

    pub fn write(class: &Class, property: &str) -> Self {
        Self::new(class, property, Direction::Write)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.direction == other.direction
            && self.property == other.property
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.property.hash(state);
        self.direction.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Read => write!(f, "{}.{}", self.type_name, self.property),
            Direction::Write => write!(f, "{}.{}!", self.type_name, self.property),
        }
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self)
    }
}

/// The member an accessor was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Method(String),
    Field(String),
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(m) => write!(f, "{}()", m),
            Member::Field(name) => write!(f, "field {}", name),
        }
    }
}

#[derive(Clone)]
enum Handle {
    Get(GetterFn),
    Set(SetterFn),
}

/// A resolved getter or setter. Cheap to clone.
#[derive(Clone)]
pub struct Accessor {
    member: Member,
    handle: Handle,
}

impl Accessor {
    pub fn getter(member: Member, call: GetterFn) -> Self {
        Accessor {
            member,
            handle: Handle::Get(call),
        }
    }

    pub fn setter(member: Member, call: SetterFn) -> Self {
        Accessor {
            member,
            handle: Handle::Set(call),
        }
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn direction(&self) -> Direction {
        match self.handle {
            Handle::Get(_) => Direction::Read,
            Handle::Set(_) => Direction::Write,
        }
    }

    pub fn get(&self, bean: &dyn Bean) -> Result<Value, InvocationError> {
        match &self.handle {
            Handle::Get(call) => call(bean),
            Handle::Set(_) => Err(InvocationError::Failed(format!(
                "{} is a setter",
                self.member
            ))),
        }
    }

    pub fn set(&self, bean: &mut dyn Bean, value: Value) -> Result<(), InvocationError> {
        match &self.handle {
            Handle::Set(call) => call(bean, value),
            Handle::Get(_) => Err(InvocationError::Failed(format!(
                "{} is a getter",
                self.member
            ))),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accessor({} {})", self.direction(), self.member)
    }
}

/// Counters kept by an [`AccessorCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub negative_hits: u64,
    pub resolutions: u64,
}

/// Shared memo of resolved accessors and of failed resolutions.
pub struct AccessorCache {
    accessors: DashMap<CacheKey, Accessor>,
    missing: DashMap<CacheKey, ()>,
    negative_enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    negative_hits: AtomicU64,
    resolutions: AtomicU64,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self::with_negative_cache(true)
    }

    pub fn with_negative_cache(negative_enabled: bool) -> Self {
        AccessorCache {
            accessors: DashMap::new(),
            missing: DashMap::new(),
            negative_enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            negative_hits: AtomicU64::new(0),
            resolutions: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Accessor> {
        match self.accessors.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store unconditionally. A positive entry supersedes a negative one.
    pub fn put(&self, key: CacheKey, accessor: Accessor) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.missing.remove(&key);
        self.accessors.insert(key, accessor);
    }

    /// Was resolution for `key` already attempted and failed?
    pub fn is_missing(&self, key: &CacheKey) -> bool {
        if !self.negative_enabled {
            return false;
        }
        let missing = self.missing.contains_key(key);
        if missing {
            self.negative_hits.fetch_add(1, Ordering::Relaxed);
        }
        missing
    }

    pub fn mark_missing(&self, key: CacheKey) {
        if self.negative_enabled {
            self.missing.insert(key, ());
        }
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn missing_len(&self) -> usize {
        self.missing.len()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.accessors.contains_key(key)
    }

    pub fn clear(&self) {
        self.accessors.clear();
        self.missing.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            negative_hits: self.negative_hits.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
        }
    }
}

impl Default for AccessorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Call-scoped accessor memo owned by the caller.
///
/// A binding pass that reads many properties of the same objects passes one
/// of these to `read_with_cache`; lookups hit this map before the service's
/// shared cache.
#[derive(Default)]
pub struct LookupCache {
    entries: HashMap<CacheKey, Accessor>,
}

impl LookupCache {
    pub fn new() -> Self {
        LookupCache {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Accessor> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, accessor: Accessor) {
        self.entries.insert(key, accessor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
