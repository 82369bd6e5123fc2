//! # proppath - property paths over dynamic object graphs
//!
//! Reads and writes values through dotted property paths such as
//! `"order.customer.address.city"`, resolving each segment against maps and
//! application objects:
//! - Explicit class descriptors instead of runtime reflection
//! - Accessor caching per (type, property, direction), with a failure cache
//! - Two interchangeable backends, one of them backed by a PEG path grammar
//! - TOML configuration and a backend registry
//!
//! ## Quick Start
//!
//! ### Declaring a bean
//!
//! ```
//! use proppath::bean;
//! use proppath::ds::class::ClassBuilder;
//! use proppath::ds::value::{ObjectRef, Value};
//! use proppath::service::{PropertyService, ReflectPropertyService};
//!
//! #[derive(Default)]
//! struct Customer {
//!     name: String,
//!     vip: bool,
//! }
//!
//! bean!(Customer, CUSTOMER_CLASS => ClassBuilder::<Customer>::new("Customer")
//!     .getter("getName", |c| c.name.clone())
//!     .setter("setName", |c, name: String| c.name = name)
//!     .getter("isVip", |c| c.vip)
//!     .build());
//!
//! let service = ReflectPropertyService::new();
//! let customer = Value::from(ObjectRef::new(Customer::default()));
//!
//! service.write(&customer, "name", Value::from("Ada")).unwrap();
//! assert_eq!(service.read(&customer, "name").unwrap(), Value::from("Ada"));
//! assert_eq!(service.read(&customer, "vip").unwrap(), Value::Bool(false));
//! assert_eq!(service.read(&customer, "class").unwrap(), Value::from("Customer"));
//! ```
//!
//! ### Nested paths and maps
//!
//! ```
//! use proppath::ds::value::{MapRef, Value};
//! use proppath::service::{ExpressionPropertyService, PropertyService};
//!
//! let service = ExpressionPropertyService::new();
//! let target = Value::from(MapRef::from_entries(vec![
//!     ("address", Value::Null),
//!     ("aa.bbb", Value::from(1i64)),
//! ]));
//!
//! // keys may contain dots
//! assert_eq!(service.read(&target, "aa.bbb").unwrap(), Value::Int(1));
//!
//! // writing through a null intermediate does nothing
//! service.write(&target, "address.street", Value::from("Main")).unwrap();
//! assert_eq!(service.read(&target, "address").unwrap(), Value::Null);
//! ```
//!
//! ## Architecture
//!
//! - **[`ds`]** - Values, class descriptors, errors and the accessor cache
//! - **[`parser`]** - PEG grammar for property paths
//! - **[`service`]** - Property services, resolution strategies, registry and
//!   configuration

#[doc(hidden)]
pub use lazy_static::lazy_static as __lazy_static;

pub mod ds;
pub mod parser;
pub mod service;
