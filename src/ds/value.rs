use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ds::class::{Bean, Class};
use crate::ds::error::InvocationError;

pub const TYPE_STR_NULL: &str = "Null";
pub const TYPE_STR_BOOL: &str = "Bool";
pub const TYPE_STR_INT: &str = "Int";
pub const TYPE_STR_FLOAT: &str = "Float";
pub const TYPE_STR_STRING: &str = "Str";
pub const TYPE_STR_MAP: &str = "Map";

/// A dynamically typed value flowing through property paths.
///
/// `Map` and `Object` are reference types: cloning the value shares the
/// container, so a write through one clone is seen by every other.
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(MapRef),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the runtime type, used in diagnostics. Objects report their
    /// class name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => TYPE_STR_NULL.to_string(),
            Value::Bool(_) => TYPE_STR_BOOL.to_string(),
            Value::Int(_) => TYPE_STR_INT.to_string(),
            Value::Float(_) => TYPE_STR_FLOAT.to_string(),
            Value::Str(_) => TYPE_STR_STRING.to_string(),
            Value::Map(_) => TYPE_STR_MAP.to_string(),
            Value::Object(o) => o.class().name().to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Convert into a typed value without coercion.
    pub fn convert<T: FromValue>(self) -> Result<T, InvocationError> {
        T::from_value(self)
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Float(f) => Value::Float(*f),
            Value::Str(s) => Value::Str(s.to_string()),
            Value::Map(m) => Value::Map(m.clone()),
            Value::Object(o) => Value::Object(o.clone()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Map(m) => write!(f, "Map({} entries)", m.len()),
            Value::Object(o) => write!(f, "{}@{:p}", o.class().name(), Arc::as_ptr(&o.0)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::Int(i) => write!(f, "Value::Int({})", i),
            Value::Float(n) => write!(f, "Value::Float({:?})", n),
            Value::Str(s) => write!(f, "Value::Str({:?})", s),
            Value::Map(m) => write!(f, "Value::Map({:?})", m.keys()),
            Value::Object(o) => write!(f, "Value::Object({})", o.class().name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<MapRef> for Value {
    fn from(m: MapRef) -> Self {
        Value::Map(m)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        match o {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Typed extraction from a [`Value`], used by setters.
///
/// Conversions are exact: no number widening, no string parsing.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, InvocationError>;
}

fn mismatch(expected: &str, actual: &Value) -> InvocationError {
    InvocationError::ArgumentType {
        expected: expected.to_string(),
        actual: actual.type_name(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(TYPE_STR_BOOL, &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(mismatch(TYPE_STR_INT, &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(mismatch(TYPE_STR_FLOAT, &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(TYPE_STR_STRING, &other)),
        }
    }
}

impl FromValue for MapRef {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Map(m) => Ok(m),
            other => Err(mismatch(TYPE_STR_MAP, &other)),
        }
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(mismatch("Object", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, InvocationError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Shared string-keyed map. This is the keyed-associative container that
/// property paths read and write directly, without accessor resolution.
#[derive(Clone, Default)]
pub struct MapRef(Arc<RwLock<HashMap<String, Value>>>);

impl MapRef {
    pub fn new() -> Self {
        MapRef(Arc::new(RwLock::new(HashMap::new())))
    }

    pub fn from_entries<K: Into<String>, V: Into<Value>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MapRef(Arc::new(RwLock::new(map)))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn ptr_eq(&self, other: &MapRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared handle to a bean.
///
/// Getters run under the read lock, setters under the write lock. The lock is
/// never held across two path segments. The class is stored beside the lock,
/// so `class()` and the `Debug`/`Display` output never lock, even while a
/// setter holds the write lock on the same bean.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell<dyn Bean>>);

struct ObjectCell<B: ?Sized> {
    class: &'static Class,
    bean: RwLock<B>,
}

impl ObjectRef {
    pub fn new<T: Bean>(bean: T) -> Self {
        let cell: Arc<ObjectCell<dyn Bean>> = Arc::new(ObjectCell {
            class: bean.class(),
            bean: RwLock::new(bean),
        });
        ObjectRef(cell)
    }

    pub fn class(&self) -> &'static Class {
        self.0.class
    }

    pub fn read(&self) -> RwLockReadGuard<'_, dyn Bean> {
        self.0.bean.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Bean> {
        self.0.bean.write()
    }

    /// Run `f` against the bean if it is a `T`.
    pub fn with<T: Bean, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.0.bean.read();
        guard.as_any().downcast_ref::<T>().map(f)
    }

    /// Run `f` against the bean mutably if it is a `T`.
    pub fn with_mut<T: Bean, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.0.bean.write();
        guard.as_any_mut().downcast_mut::<T>().map(f)
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.class().name())
    }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MapRef({:?})", self.keys())
    }
}
