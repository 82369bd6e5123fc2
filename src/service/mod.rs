//! Property services: read and write values through dotted property paths.
//!
//! A [`PropertyService`] takes a target [`Value`](crate::ds::value::Value) and
//! a path such as `"child.name"` and walks the path one segment at a time.
//! Each segment is resolved against the current target:
//!
//! ```text
//! Segment Lookup Order:
//! 1. Map holding the rest of the path as one key
//! 2. Map entry
//! 3. Getter / setter method (prefixed, then exact name)
//! 4. Public field
//! ```
//!
//! Bean accessors are resolved once per (type, property, direction) and kept
//! in an [`AccessorCache`](crate::ds::cache::AccessorCache). Failed lookups are
//! kept too, so an unknown property costs one strategy walk.
//!
//! ### Backends
//!
//! - **[`ReflectPropertyService`]**: splits the path at every step
//! - **[`ExpressionPropertyService`]**: compiles the path with a PEG grammar,
//!   keeps the compiled form and evaluates it with a chain of
//!   [`PropertyAccessor`]s
//!
//! Both behave identically. [`ServiceRegistry`] picks one by name from a
//! [`ServiceConfig`].
//!
//! ## Example
//!
//! ```
//! use proppath::ds::value::{MapRef, Value};
//! use proppath::service::{ServiceConfig, ServiceRegistry};
//!
//! let config = ServiceConfig::parse(
//!     r#"
//!     [property_service]
//!     backend = "expression"
//!     "#,
//! )
//! .unwrap();
//! let service = ServiceRegistry::with_core().create(&config).unwrap();
//!
//! let inner = MapRef::new();
//! let target = Value::from(MapRef::from_entries(vec![("inner", inner.clone())]));
//! service.write(&target, "inner.city", Value::from("Oslo")).unwrap();
//! assert_eq!(service.read(&target, "inner.city").unwrap(), Value::from("Oslo"));
//! assert_eq!(inner.get("city"), Some(Value::from("Oslo")));
//! ```

pub mod config;
pub mod expression;
pub mod reflect;
pub mod registry;
pub mod resolver;
pub mod strategy;
pub mod types;

pub use config::{ConfigError, ServiceConfig};
pub use expression::{ExpressionPropertyService, PropertyAccessor};
pub use reflect::ReflectPropertyService;
pub use registry::ServiceRegistry;
pub use resolver::BeanResolver;
pub use strategy::{AccessorStrategy, StrategyChain};
pub use types::PropertyService;
