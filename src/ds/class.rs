//! Class descriptors: the introspection model that property paths resolve
//! against.
//!
//! A type becomes reachable through property paths by implementing [`Bean`]
//! and publishing a static [`Class`]. The class lists what a reflective
//! runtime would discover on its own:
//!
//! - zero-argument methods (`getName`, `isValid`, `name`)
//! - one-argument methods (`setName`, `name`)
//! - public fields, each with a getter and, unless final, a setter
//!
//! Descriptors are built once with [`ClassBuilder`] and never change. The
//! [`bean!`](crate::bean) macro wraps the builder in a `lazy_static!` and
//! implements [`Bean`] in one go:
//!
//! ```
//! use proppath::bean;
//! use proppath::ds::class::ClassBuilder;
//!
//! #[derive(Default)]
//! struct Person {
//!     name: Option<String>,
//! }
//!
//! bean!(Person, PERSON_CLASS => ClassBuilder::<Person>::new("Person")
//!     .getter("getName", |p| p.name.clone())
//!     .setter("setName", |p, name: Option<String>| p.name = name)
//!     .build());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::ds::error::InvocationError;
use crate::ds::value::{FromValue, Value};

/// Implicit zero-argument method every class answers with its own name.
pub const GET_CLASS_METHOD: &str = "getClass";

/// A type whose properties can be reached through property paths.
pub trait Bean: Any + Send + Sync {
    fn class(&self) -> &'static Class;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Zero-argument call on a bean.
pub type GetterFn = Arc<dyn Fn(&dyn Bean) -> Result<Value, InvocationError> + Send + Sync>;

/// One-argument call on a bean.
pub type SetterFn = Arc<dyn Fn(&mut dyn Bean, Value) -> Result<(), InvocationError> + Send + Sync>;

/// A public field. Final fields have no setter.
#[derive(Clone)]
pub struct Field {
    name: String,
    get: GetterFn,
    set: Option<SetterFn>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn getter(&self) -> &GetterFn {
        &self.get
    }

    pub fn setter(&self) -> Option<&SetterFn> {
        self.set.as_ref()
    }

    pub fn is_final(&self) -> bool {
        self.set.is_none()
    }
}

/// Static description of a bean type.
pub struct Class {
    name: String,
    type_id: TypeId,
    zero_arg_methods: HashMap<String, GetterFn>,
    one_arg_methods: HashMap<String, SetterFn>,
    fields: HashMap<String, Field>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn zero_arg_method(&self, name: &str) -> Option<&GetterFn> {
        self.zero_arg_methods.get(name)
    }

    pub fn one_arg_method(&self, name: &str) -> Option<&SetterFn> {
        self.one_arg_methods.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .zero_arg_methods
            .keys()
            .chain(self.one_arg_methods.keys())
            .map(|n| n.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|n| n.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .field("fields", &self.field_names())
            .finish()
    }
}

fn downcast<T: Bean>(bean: &dyn Bean) -> Result<&T, InvocationError> {
    bean.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| InvocationError::ReceiverMismatch {
            expected: std::any::type_name::<T>().to_string(),
        })
}

fn downcast_mut<T: Bean>(bean: &mut dyn Bean) -> Result<&mut T, InvocationError> {
    bean.as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| InvocationError::ReceiverMismatch {
            expected: std::any::type_name::<T>().to_string(),
        })
}

/// Typed builder for a [`Class`].
///
/// Every member is registered against a concrete `T`; the stored closures
/// downcast the receiver before calling into user code.
pub struct ClassBuilder<T: Bean> {
    name: String,
    zero_arg_methods: HashMap<String, GetterFn>,
    one_arg_methods: HashMap<String, SetterFn>,
    fields: HashMap<String, Field>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Bean> ClassBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            zero_arg_methods: HashMap::new(),
            one_arg_methods: HashMap::new(),
            fields: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Add a zero-argument method that cannot fail.
    pub fn getter<V, F>(self, name: impl Into<String>, f: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.method(name, move |t| Ok(f(t).into()))
    }

    /// Add a zero-argument method.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        let call: GetterFn = Arc::new(move |bean: &dyn Bean| -> Result<Value, InvocationError> {
            f(downcast::<T>(bean)?)
        });
        self.zero_arg_methods.insert(name.into(), call);
        self
    }

    /// Add a one-argument method taking a typed argument.
    pub fn setter<V, F>(self, name: impl Into<String>, f: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.method_mut(name, move |t, value| {
            f(t, V::from_value(value)?);
            Ok(())
        })
    }

    /// Add a one-argument method.
    pub fn method_mut<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut T, Value) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        let call: SetterFn = Arc::new(
            move |bean: &mut dyn Bean, value: Value| -> Result<(), InvocationError> {
                f(downcast_mut::<T>(bean)?, value)
            },
        );
        self.one_arg_methods.insert(name.into(), call);
        self
    }

    /// Add a public, assignable field.
    pub fn field<V, G, S>(mut self, name: impl Into<String>, get: G, set: S) -> Self
    where
        V: Into<Value> + FromValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        let get: GetterFn = Arc::new(move |bean: &dyn Bean| -> Result<Value, InvocationError> {
            Ok(get(downcast::<T>(bean)?).into())
        });
        let set: SetterFn = Arc::new(move |bean: &mut dyn Bean, value: Value| -> Result<(), InvocationError> {
            let arg = V::from_value(value)?;
            set(downcast_mut::<T>(bean)?, arg);
            Ok(())
        });
        self.fields.insert(
            name.clone(),
            Field {
                name,
                get,
                set: Some(set),
            },
        );
        self
    }

    /// Add a public final field.
    pub fn final_field<V, G>(mut self, name: impl Into<String>, get: G) -> Self
    where
        V: Into<Value>,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let name = name.into();
        let get: GetterFn = Arc::new(move |bean: &dyn Bean| -> Result<Value, InvocationError> {
            Ok(get(downcast::<T>(bean)?).into())
        });
        self.fields.insert(
            name.clone(),
            Field {
                name,
                get,
                set: None,
            },
        );
        self
    }

    pub fn build(mut self) -> Class {
        let class_name = self.name.clone();
        let get_class: GetterFn = Arc::new(move |_: &dyn Bean| -> Result<Value, InvocationError> {
            Ok(Value::Str(class_name.clone()))
        });
        self.zero_arg_methods
            .entry(GET_CLASS_METHOD.to_string())
            .or_insert(get_class);
        Class {
            name: self.name,
            type_id: TypeId::of::<T>(),
            zero_arg_methods: self.zero_arg_methods,
            one_arg_methods: self.one_arg_methods,
            fields: self.fields,
        }
    }
}

/// Declare the class of a bean type and implement [`Bean`] for it.
///
/// The class is built lazily on first use and lives in a static.
#[macro_export]
macro_rules! bean {
    ($ty:ty, $class:ident => $builder:expr) => {
        $crate::__lazy_static! {
            static ref $class: $crate::ds::class::Class = $builder;
        }

        impl $crate::ds::class::Bean for $ty {
            fn class(&self) -> &'static $crate::ds::class::Class {
                &$class
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
